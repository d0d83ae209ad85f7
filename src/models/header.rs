use serde::{Deserialize, Serialize};

use super::error::CxmlError;
use crate::xml::XmlWriter;

/// Literal substituted for unset identity/user-agent fields on render.
///
/// Existing cXML receivers expect the literal text rather than an omitted
/// element, so this is a wire contract, not a placeholder of convenience.
pub const UNKNOWN: &str = "Unknown";

/// Authentication and routing block of the envelope.
///
/// All fields are optional in memory. On render, unset identities and the
/// user agent default to [`UNKNOWN`]; the shared secret is the one field
/// that is omitted instead of defaulted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    /// Identity of the sending credential, matched against the receiver's
    /// account configuration.
    pub sender_identity: Option<String>,
    /// Shared secret authenticating the sender.
    pub sender_shared_secret: Option<String>,
    /// Identity of the originating party.
    pub from: Option<String>,
    /// Identity of the receiving party.
    pub to: Option<String>,
    /// Software identification of the sender.
    pub user_agent: Option<String>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for the common outgoing case: a credential
    /// pair plus user agent.
    pub fn with_credentials(
        sender_identity: impl Into<String>,
        sender_shared_secret: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            sender_identity: Some(sender_identity.into()),
            sender_shared_secret: Some(sender_shared_secret.into()),
            user_agent: Some(user_agent.into()),
            ..Self::default()
        }
    }

    pub(crate) fn render(&self, w: &mut XmlWriter) -> Result<(), CxmlError> {
        w.start_element("Header")?;

        w.start_element("From")?;
        write_credential(w, self.from.as_deref().unwrap_or(UNKNOWN), None)?;
        w.end_element("From")?;

        w.start_element("To")?;
        write_credential(w, self.to.as_deref().unwrap_or(UNKNOWN), None)?;
        w.end_element("To")?;

        w.start_element("Sender")?;
        write_credential(
            w,
            self.sender_identity.as_deref().unwrap_or(UNKNOWN),
            self.sender_shared_secret.as_deref(),
        )?;
        w.text_element("UserAgent", self.user_agent.as_deref().unwrap_or(UNKNOWN))?;
        w.end_element("Sender")?;

        w.end_element("Header")?;
        Ok(())
    }

    /// Build a header from the credential fields extracted out of a received
    /// document. Parse reads only `Sender/Credential/{Identity,SharedSecret}`;
    /// the render-time [`UNKNOWN`] defaults are never fed back.
    pub(crate) fn from_credentials(
        sender_identity: Option<String>,
        sender_shared_secret: Option<String>,
    ) -> Result<Self, CxmlError> {
        let sender_identity = sender_identity
            .ok_or_else(|| CxmlError::malformed("Header/Sender/Credential/Identity not found"))?;
        let sender_shared_secret = sender_shared_secret.ok_or_else(|| {
            CxmlError::malformed("Header/Sender/Credential/SharedSecret not found")
        })?;
        Ok(Self {
            sender_identity: Some(sender_identity),
            sender_shared_secret: Some(sender_shared_secret),
            ..Self::default()
        })
    }
}

/// `From`/`To`/`Sender` share one credential shape: `Credential` with an
/// empty `domain` attribute wrapping an `Identity`, plus the shared secret
/// for the sender when set.
fn write_credential(
    w: &mut XmlWriter,
    identity: &str,
    shared_secret: Option<&str>,
) -> Result<(), CxmlError> {
    w.start_element_with_attrs("Credential", &[("domain", "")])?;
    w.text_element("Identity", identity)?;
    if let Some(secret) = shared_secret {
        w.text_element("SharedSecret", secret)?;
    }
    w.end_element("Credential")?;
    Ok(())
}
