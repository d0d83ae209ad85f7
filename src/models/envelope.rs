use chrono::{DateTime, FixedOffset, SecondsFormat};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::CxmlError;
use super::header::Header;
use super::item::ItemIn;
use super::message::{PunchOutOrderMessage, PunchOutOrderMessageHeader};
use super::response::{PunchOutSetupResponse, Response, Status};
use crate::xml::XmlWriter;

/// cXML 1.2.014 document type declaration.
const CXML_DOCTYPE: &str = r#"cXML SYSTEM "http://xml.cxml.org/schemas/cXML/1.2.014/cXML.dtd""#;

/// The body slot of an envelope: a message or an ordered response sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum Body {
    Message(PunchOutOrderMessage),
    Responses(Vec<Response>),
}

/// A cXML document envelope.
///
/// Carries the payload identifier, a timezone-aware timestamp, an optional
/// [`Header`], and exactly one body kind. Responses accumulate (a `Status`
/// and a `PunchOutSetupResponse` commonly travel together); assigning a
/// message where responses exist, a response where a message exists, or a
/// second message is rejected with [`CxmlError::BodyConflict`] rather than
/// silently replacing the prior body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CXml {
    payload_id: String,
    timestamp: DateTime<FixedOffset>,
    header: Option<Header>,
    body: Option<Body>,
}

impl CXml {
    /// Create an envelope. The payload id must be non-empty; it is expected
    /// to be unique per transmission.
    pub fn new(
        payload_id: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<Self, CxmlError> {
        let payload_id = payload_id.into();
        if payload_id.is_empty() {
            return Err(CxmlError::invalid("payload_id", "must not be empty"));
        }
        Ok(Self {
            payload_id,
            timestamp,
            header: None,
            body: None,
        })
    }

    pub fn set_header(&mut self, header: Header) {
        self.header = Some(header);
    }

    /// Assign the message body. Fails if any body is already present.
    pub fn set_message(&mut self, message: PunchOutOrderMessage) -> Result<(), CxmlError> {
        match self.body {
            Some(Body::Message(_)) => Err(CxmlError::BodyConflict("message")),
            Some(Body::Responses(_)) => Err(CxmlError::BodyConflict("response")),
            None => {
                self.body = Some(Body::Message(message));
                Ok(())
            }
        }
    }

    /// Append a response. Fails if a message body is already present.
    pub fn add_response(&mut self, response: impl Into<Response>) -> Result<(), CxmlError> {
        match &mut self.body {
            Some(Body::Message(_)) => Err(CxmlError::BodyConflict("message")),
            Some(Body::Responses(responses)) => {
                responses.push(response.into());
                Ok(())
            }
            None => {
                self.body = Some(Body::Responses(vec![response.into()]));
                Ok(())
            }
        }
    }

    pub fn get_payload_id(&self) -> &str {
        &self.payload_id
    }

    pub fn get_timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn get_header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn get_message(&self) -> Option<&PunchOutOrderMessage> {
        match &self.body {
            Some(Body::Message(message)) => Some(message),
            _ => None,
        }
    }

    pub fn get_responses(&self) -> &[Response] {
        match &self.body {
            Some(Body::Responses(responses)) => responses,
            _ => &[],
        }
    }

    /// Render the document to XML text.
    ///
    /// The timestamp keeps the offset it was constructed with — never
    /// normalized to UTC, never abbreviated to `Z`.
    pub fn render(&self) -> Result<String, CxmlError> {
        let body = self
            .body
            .as_ref()
            .ok_or(CxmlError::MissingRequiredField("cXML body"))?;

        let mut w = XmlWriter::new()?;
        w.doctype(CXML_DOCTYPE)?;

        let timestamp = self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, false);
        w.start_element_with_attrs(
            "cXML",
            &[("payloadID", self.payload_id.as_str()), ("timestamp", &timestamp)],
        )?;

        if let Some(header) = &self.header {
            header.render(&mut w)?;
        }

        match body {
            Body::Message(message) => message.render(&mut w)?,
            Body::Responses(responses) => {
                w.start_element("Response")?;
                for response in responses {
                    response.render(&mut w)?;
                }
                w.end_element("Response")?;
            }
        }

        w.end_element("cXML")?;
        w.into_string()
    }

    /// Parse a received cXML document.
    ///
    /// A single streaming pass locates the root attributes, the header
    /// credential subtree, and the body, then reconstructs the typed graph.
    /// Any required subtree or attribute that cannot be located fails with
    /// [`CxmlError::MalformedDocument`]; no parse-side defaulting happens.
    pub fn parse(xml: &str) -> Result<Self, CxmlError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut p = DocumentParsed::default();
        let mut path: Vec<String> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let name = std::str::from_utf8(e.name().as_ref())
                        .unwrap_or("")
                        .to_string();
                    p.handle_start(&name, e);
                    path.push(name);
                }
                Ok(Event::Empty(ref e)) => {
                    let name = std::str::from_utf8(e.name().as_ref())
                        .unwrap_or("")
                        .to_string();
                    p.handle_start(&name, e);
                    p.handle_end(&name);
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().unwrap_or_default().to_string();
                    if !text.is_empty() {
                        p.handle_text(&path, &text);
                    }
                }
                Ok(Event::End(_)) => {
                    let ended = path.pop().unwrap_or_default();
                    p.handle_end(&ended);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(CxmlError::malformed(format!("XML parse error: {e}")));
                }
                _ => {}
            }
        }

        p.into_cxml()
    }
}

fn attr(e: &BytesStart, key: &str) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        if a.key.as_ref() == key.as_bytes() {
            Some(String::from_utf8_lossy(&a.value).into_owned())
        } else {
            None
        }
    })
}

fn parse_money(text: &str, context: &str) -> Result<Decimal, CxmlError> {
    Decimal::from_str(text)
        .map_err(|_| CxmlError::malformed(format!("non-numeric Money in {context}: {text:?}")))
}

/// Accumulator for one document pass. Fields are collected as raw strings
/// and converted into the typed model in [`DocumentParsed::into_cxml`].
#[derive(Default)]
struct DocumentParsed {
    payload_id: Option<String>,
    timestamp: Option<String>,
    saw_root: bool,

    saw_header: bool,
    sender_identity: Option<String>,
    sender_shared_secret: Option<String>,

    saw_message: bool,
    buyer_cookie: Option<String>,
    currency: Option<String>,
    locale: Option<String>,
    operation_allowed: Option<String>,
    total_amount: Option<String>,
    shipping_cost: Option<String>,
    shipping_description: Option<String>,
    tax_sum: Option<String>,
    tax_description: Option<String>,
    items: Vec<ItemParsed>,
    current_item: Option<ItemParsed>,

    responses: Vec<Response>,
    current_status: Option<StatusParsed>,
    start_page_url: Option<String>,
}

#[derive(Default)]
struct ItemParsed {
    quantity: Option<String>,
    supplier_part_id: Option<String>,
    supplier_part_auxiliary_id: Option<String>,
    unit_price: Option<String>,
    description: Option<String>,
    unit_of_measure: Option<String>,
    classifications: Vec<(String, String)>,
    current_classification_domain: Option<String>,
    manufacturer_part_id: Option<String>,
    manufacturer_name: Option<String>,
    lead_time: Option<String>,
}

#[derive(Default)]
struct StatusParsed {
    code: Option<String>,
    text: Option<String>,
    message: Option<String>,
}

impl DocumentParsed {
    fn handle_start(&mut self, name: &str, e: &BytesStart) {
        match name {
            "cXML" => {
                self.saw_root = true;
                self.payload_id = attr(e, "payloadID");
                self.timestamp = attr(e, "timestamp");
            }
            "Header" => self.saw_header = true,
            "PunchOutOrderMessage" => self.saw_message = true,
            "PunchOutOrderMessageHeader" => {
                self.operation_allowed = attr(e, "operationAllowed");
            }
            "ItemIn" => {
                self.current_item = Some(ItemParsed {
                    quantity: attr(e, "quantity"),
                    ..ItemParsed::default()
                });
            }
            "Money" => {
                if self.currency.is_none() {
                    self.currency = attr(e, "currency");
                }
            }
            "Description" => {
                if self.locale.is_none() {
                    self.locale = attr(e, "xml:lang");
                }
            }
            "Classification" => {
                if let Some(item) = self.current_item.as_mut() {
                    item.current_classification_domain = attr(e, "domain");
                }
            }
            "Status" => {
                self.current_status = Some(StatusParsed {
                    code: attr(e, "code"),
                    text: attr(e, "text"),
                    message: None,
                });
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, path: &[String], text: &str) {
        let leaf = path.last().map(String::as_str).unwrap_or("");
        let parent = if path.len() >= 2 {
            path[path.len() - 2].as_str()
        } else {
            ""
        };
        let in_sender = path.iter().any(|p| p == "Sender");
        let in_item = path.iter().any(|p| p == "ItemIn");

        // Header credentials: first match wins.
        if in_sender && parent == "Credential" {
            match leaf {
                "Identity" if self.sender_identity.is_none() => {
                    self.sender_identity = Some(text.to_string());
                    return;
                }
                "SharedSecret" if self.sender_shared_secret.is_none() => {
                    self.sender_shared_secret = Some(text.to_string());
                    return;
                }
                _ => {}
            }
        }

        if in_item {
            let item = match self.current_item.as_mut() {
                Some(item) => item,
                None => return,
            };
            match leaf {
                "SupplierPartID" => item.supplier_part_id = Some(text.to_string()),
                "SupplierPartAuxiliaryID" => {
                    item.supplier_part_auxiliary_id = Some(text.to_string());
                }
                "Money" if parent == "UnitPrice" => item.unit_price = Some(text.to_string()),
                "Description" => item.description = Some(text.to_string()),
                "UnitOfMeasure" => item.unit_of_measure = Some(text.to_string()),
                "Classification" => {
                    let domain = item.current_classification_domain.take().unwrap_or_default();
                    item.classifications.push((domain, text.to_string()));
                }
                "ManufacturerPartID" => item.manufacturer_part_id = Some(text.to_string()),
                "ManufacturerName" => item.manufacturer_name = Some(text.to_string()),
                "LeadTime" => item.lead_time = Some(text.to_string()),
                _ => {}
            }
            return;
        }

        match leaf {
            "BuyerCookie" => self.buyer_cookie = Some(text.to_string()),
            "Money" => match parent {
                "Total" => self.total_amount = Some(text.to_string()),
                "Shipping" => self.shipping_cost = Some(text.to_string()),
                "Tax" => self.tax_sum = Some(text.to_string()),
                _ => {}
            },
            "Description" => match parent {
                "Shipping" => self.shipping_description = Some(text.to_string()),
                "Tax" => self.tax_description = Some(text.to_string()),
                _ => {}
            },
            "Status" => {
                if let Some(status) = self.current_status.as_mut() {
                    status.message = Some(text.to_string());
                }
            }
            "URL" if parent == "StartPage" => self.start_page_url = Some(text.to_string()),
            _ => {}
        }
    }

    fn handle_end(&mut self, ended: &str) {
        match ended {
            "ItemIn" => {
                if let Some(item) = self.current_item.take() {
                    self.items.push(item);
                }
            }
            "Status" => {
                if let Some(status) = self.current_status.take() {
                    let code = status
                        .code
                        .and_then(|c| c.parse::<u16>().ok())
                        .unwrap_or(200);
                    let mut parsed = Status::with(code, status.text.unwrap_or_default());
                    if let Some(message) = status.message {
                        parsed = parsed.message(message);
                    }
                    self.responses.push(Response::Status(parsed));
                }
            }
            "PunchOutSetupResponse" => {
                if let Some(url) = self.start_page_url.take() {
                    if let Ok(response) = PunchOutSetupResponse::new(url) {
                        self.responses.push(Response::PunchOutSetupResponse(response));
                    }
                }
            }
            _ => {}
        }
    }

    fn into_cxml(self) -> Result<CXml, CxmlError> {
        if !self.saw_root {
            return Err(CxmlError::malformed("cXML root element not found"));
        }
        let payload_id = self
            .payload_id
            .ok_or_else(|| CxmlError::malformed("cXML payloadID attribute not found"))?;
        let timestamp = self
            .timestamp
            .ok_or_else(|| CxmlError::malformed("cXML timestamp attribute not found"))?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| CxmlError::malformed(format!("bad timestamp {timestamp:?}: {e}")))?;

        let mut envelope = CXml::new(payload_id, timestamp)?;

        if self.saw_header {
            envelope.set_header(Header::from_credentials(
                self.sender_identity,
                self.sender_shared_secret,
            )?);
        }

        if self.saw_message {
            envelope.set_message(build_message(
                self.buyer_cookie,
                self.currency,
                self.locale,
                self.operation_allowed,
                self.total_amount,
                self.shipping_cost,
                self.shipping_description,
                self.tax_sum,
                self.tax_description,
                self.items,
            )?)?;
        } else if !self.responses.is_empty() {
            for response in self.responses {
                envelope.add_response(response)?;
            }
        } else {
            return Err(CxmlError::malformed(
                "cXML carries neither a Message nor a Response body",
            ));
        }

        Ok(envelope)
    }
}

#[allow(clippy::too_many_arguments)]
fn build_message(
    buyer_cookie: Option<String>,
    currency: Option<String>,
    locale: Option<String>,
    operation_allowed: Option<String>,
    total_amount: Option<String>,
    shipping_cost: Option<String>,
    shipping_description: Option<String>,
    tax_sum: Option<String>,
    tax_description: Option<String>,
    items: Vec<ItemParsed>,
) -> Result<PunchOutOrderMessage, CxmlError> {
    let buyer_cookie =
        buyer_cookie.ok_or_else(|| CxmlError::malformed("BuyerCookie not found"))?;
    let currency =
        currency.ok_or_else(|| CxmlError::malformed("no Money currency attribute found"))?;
    let locale = locale
        .ok_or_else(|| CxmlError::malformed("no xml:lang attribute found to recover locale"))?;

    let mut message = PunchOutOrderMessage::new(buyer_cookie, currency, locale)
        .map_err(|e| CxmlError::malformed(e.to_string()))?;

    if let Some(total) = total_amount {
        let mut header =
            PunchOutOrderMessageHeader::new(parse_money(&total, "PunchOutOrderMessageHeader/Total")?);
        if let Some(cost) = shipping_cost {
            header = header.shipping_cost(parse_money(&cost, "Shipping")?);
        }
        if let Some(description) = shipping_description {
            header = header.shipping_description(description);
        }
        if let Some(sum) = tax_sum {
            header = header.tax_sum(parse_money(&sum, "Tax")?);
        }
        if let Some(description) = tax_description {
            header = header.tax_description(description);
        }
        if let Some(operation) = operation_allowed {
            header = header.operation_allowed(operation);
        }
        message = message.header(header);
    }

    for parsed in items {
        message = message.add_item(build_item(parsed)?);
    }
    Ok(message)
}

fn build_item(parsed: ItemParsed) -> Result<ItemIn, CxmlError> {
    let quantity = parsed
        .quantity
        .ok_or_else(|| CxmlError::malformed("ItemIn quantity attribute not found"))?;
    let quantity = quantity
        .parse::<u32>()
        .map_err(|_| CxmlError::malformed(format!("bad ItemIn quantity {quantity:?}")))?;
    let supplier_part_id = parsed
        .supplier_part_id
        .ok_or_else(|| CxmlError::malformed("ItemIn SupplierPartID not found"))?;

    let mut item = ItemIn::new(quantity, supplier_part_id)
        .map_err(|e| CxmlError::malformed(e.to_string()))?;

    if let Some(aux) = parsed.supplier_part_auxiliary_id {
        item = item.supplier_part_auxiliary_id(aux);
    }
    if let Some(price) = parsed.unit_price {
        item = item.unit_price(parse_money(&price, "ItemIn/UnitPrice")?);
    }
    if let Some(description) = parsed.description {
        item = item.description(description);
    }
    if let Some(unit) = parsed.unit_of_measure {
        item = item.unit_of_measure(unit);
    }
    for (domain, value) in parsed.classifications {
        item = item.add_classification(domain, value);
    }
    if let Some(id) = parsed.manufacturer_part_id {
        item = item.manufacturer_part_id(id);
    }
    if let Some(name) = parsed.manufacturer_name {
        item = item.manufacturer_name(name);
    }
    if let Some(lead_time) = parsed.lead_time {
        let days = lead_time
            .parse::<u32>()
            .map_err(|_| CxmlError::malformed(format!("bad LeadTime {lead_time:?}")))?;
        item = item.lead_time(days);
    }
    Ok(item)
}
