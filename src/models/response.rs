use serde::{Deserialize, Serialize};

use super::error::CxmlError;
use crate::xml::XmlWriter;

/// Transaction status of a response. Defaults to `200 OK`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    code: u16,
    text: String,
    message: Option<String>,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            code: 200,
            text: "OK".to_string(),
            message: None,
        }
    }
}

impl Status {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-success status, e.g. `Status::with(500, "Internal Server Error")`.
    pub fn with(code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
            message: None,
        }
    }

    /// Free-text detail carried as the element body.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn get_code(&self) -> u16 {
        self.code
    }

    pub fn get_text(&self) -> &str {
        &self.text
    }

    fn render(&self, w: &mut XmlWriter) -> Result<(), CxmlError> {
        let code = self.code.to_string();
        let attrs = [("code", code.as_str()), ("text", self.text.as_str())];
        match &self.message {
            Some(message) => {
                w.text_element_with_attrs("Status", message, &attrs)?;
            }
            None => {
                w.empty_element_with_attrs("Status", &attrs)?;
            }
        }
        Ok(())
    }
}

/// Supplier answer to a punch-out setup request: where to send the buyer's
/// browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchOutSetupResponse {
    start_page_url: String,
}

impl PunchOutSetupResponse {
    pub fn new(start_page_url: impl Into<String>) -> Result<Self, CxmlError> {
        let start_page_url = start_page_url.into();
        if start_page_url.is_empty() {
            return Err(CxmlError::invalid("start_page_url", "must not be empty"));
        }
        Ok(Self { start_page_url })
    }

    pub fn get_start_page_url(&self) -> &str {
        &self.start_page_url
    }

    fn render(&self, w: &mut XmlWriter) -> Result<(), CxmlError> {
        w.start_element("PunchOutSetupResponse")?;
        w.start_element("StartPage")?;
        w.text_element("URL", &self.start_page_url)?;
        w.end_element("StartPage")?;
        w.end_element("PunchOutSetupResponse")?;
        Ok(())
    }
}

/// A supplier-to-buyer response block. Variants share nothing but the
/// ability to append themselves under the envelope's `Response` element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Response {
    Status(Status),
    PunchOutSetupResponse(PunchOutSetupResponse),
}

impl Response {
    pub(crate) fn render(&self, w: &mut XmlWriter) -> Result<(), CxmlError> {
        match self {
            Self::Status(status) => status.render(w),
            Self::PunchOutSetupResponse(response) => response.render(w),
        }
    }
}

impl From<Status> for Response {
    fn from(status: Status) -> Self {
        Self::Status(status)
    }
}

impl From<PunchOutSetupResponse> for Response {
    fn from(response: PunchOutSetupResponse) -> Self {
        Self::PunchOutSetupResponse(response)
    }
}
