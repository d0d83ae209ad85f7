use thiserror::Error;

/// Errors that can occur while building, rendering, or parsing a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CxmlError {
    /// Render was attempted with a required field unset where no default
    /// policy applies.
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// Parse could not locate a required subtree/attribute, or a value in
    /// the document does not lex.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A structurally invalid value was rejected at the mutating boundary.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// The field the caller tried to set.
        field: &'static str,
        /// What was wrong with the value.
        message: String,
    },

    /// A second body kind was assigned to an envelope that already carries one.
    #[error("envelope already carries a {0} body")]
    BodyConflict(&'static str),

    /// XML serialization error.
    #[error("XML error: {0}")]
    Xml(String),
}

impl CxmlError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }
}
