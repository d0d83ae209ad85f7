//! XML writing helpers and wire-format text utilities.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::{Decimal, RoundingStrategy};
use std::borrow::Cow;
use std::io::Cursor;

use crate::models::CxmlError;

pub type XmlResult = Result<String, CxmlError>;

fn xml_io(e: std::io::Error) -> CxmlError {
    CxmlError::Xml(format!("XML write error: {e}"))
}

/// Thin wrapper around [`quick_xml::Writer`] producing an indented document
/// with an XML declaration. Each model type appends itself through these
/// helpers; the writer owns escaping of text content and attribute values.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, CxmlError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, CxmlError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| CxmlError::Xml(format!("XML UTF-8 error: {e}")))
    }

    /// Write a `<!DOCTYPE …>` declaration. The content is taken verbatim.
    pub fn doctype(&mut self, content: &str) -> Result<&mut Self, CxmlError> {
        self.writer
            .write_event(Event::DocType(BytesText::from_escaped(content)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, CxmlError> {
        let elem = BytesStart::new(name);
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, CxmlError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, CxmlError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, CxmlError> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, CxmlError> {
        self.start_element_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write a self-closing element carrying only attributes.
    pub fn empty_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, CxmlError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Empty(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    /// Write a `Money` amount with its `currency` attribute.
    pub fn money_element(
        &mut self,
        name: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<&mut Self, CxmlError> {
        self.text_element_with_attrs(name, &format_money(amount), &[("currency", currency)])
    }
}

/// Format a monetary amount for the wire — always exactly two digits after a
/// dot decimal separator, no thousands separator, independent of host locale.
/// Midpoints round away from zero (`21.885` → `"21.89"`).
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Escape the five XML-reserved characters (`< > & ' "`) for placement
/// inside element text. [`XmlWriter`] escapes automatically; this is for
/// callers assembling document fragments out-of-band.
pub fn escape_xml_text(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}
