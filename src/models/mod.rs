//! Typed cXML document model.
//!
//! The [`CXml`] envelope owns an optional [`Header`] and exactly one body —
//! a [`PunchOutOrderMessage`] or an ordered sequence of [`Response`]
//! variants. Every component appends itself to the document on render and
//! is reconstructed by the envelope's parse pass.

mod envelope;
mod error;
mod header;
mod item;
mod message;
mod response;

pub use envelope::CXml;
pub use error::CxmlError;
pub use header::{Header, UNKNOWN};
pub use item::ItemIn;
pub use message::{PunchOutOrderMessage, PunchOutOrderMessageHeader};
pub use response::{PunchOutSetupResponse, Response, Status};
