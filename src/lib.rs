//! # cxml
//!
//! Typed model of cXML (commerce XML) punch-out documents — the envelopes,
//! order messages, and responses exchanged between e-procurement buyers and
//! suppliers — with bidirectional XML mapping.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Element and attribute names are wire contract tokens shared with external
//! cXML consumers and are reproduced verbatim.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::DateTime;
//! use cxml::*;
//! use rust_decimal_macros::dec;
//!
//! let item = ItemIn::new(1, "AM2692")
//!     .unwrap()
//!     .unit_price(dec!(250))
//!     .description("ANTI-RNase (15-30 U/ul)")
//!     .unit_of_measure("EA")
//!     .add_classification("UNSPSC", "41106104");
//!
//! let message = PunchOutOrderMessage::new("f5d75ddbc9e75b6346b36ee5c28c5e8b", "EUR", "de-DE")
//!     .unwrap()
//!     .header(PunchOutOrderMessageHeader::new(dec!(271.88)).tax_sum(dec!(21.88)))
//!     .add_item(item);
//!
//! let timestamp = DateTime::parse_from_rfc3339("2018-04-07T16:16:53-05:00").unwrap();
//! let mut envelope = CXml::new("1539050765.83749@example.com", timestamp).unwrap();
//! envelope.set_header(Header::new());
//! envelope.set_message(message).unwrap();
//!
//! let xml = envelope.render().unwrap();
//! assert!(xml.contains(r#"<Money currency="EUR">250.00</Money>"#));
//! ```
//!
//! Parsing is the mirror operation: [`CXml::parse`] reconstructs the typed
//! graph from received text and fails with
//! [`CxmlError::MalformedDocument`](models::CxmlError::MalformedDocument)
//! when a required subtree is absent.

pub mod models;
pub mod xml;

// Re-export model types at crate root for convenience
pub use crate::models::*;
