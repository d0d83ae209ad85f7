#![allow(deprecated)]

use chrono::{DateTime, FixedOffset};
use cxml::*;
use rust_decimal_macros::dec;

fn envelope() -> CXml {
    let timestamp = DateTime::parse_from_rfc3339("2018-04-07T16:16:53-05:00").unwrap();
    CXml::new("1539050765.83749@example.com", timestamp).unwrap()
}

fn timestamp_of(envelope: &CXml) -> DateTime<FixedOffset> {
    envelope.get_timestamp()
}

/// Order message matching the original sample: one EUR item with the legacy
/// single classification.
fn sample_order_message() -> PunchOutOrderMessage {
    let item = ItemIn::new(1, "AM2692")
        .unwrap()
        .unit_price(dec!(250))
        .description("ANTI-RNase (15-30 U/ul)")
        .unit_of_measure("EA")
        .classification_domain("UNSPSC")
        .classification("41106104")
        .manufacturer_name("Manufacturer X")
        .manufacturer_part_id("MFPART-1")
        .lead_time(14);

    PunchOutOrderMessage::new("f5d75ddbc9e75b6346b36ee5c28c5e8b", "EUR", "de-DE")
        .unwrap()
        .header(
            PunchOutOrderMessageHeader::new(dec!(271.88))
                .shipping_cost(dec!(0))
                .shipping_description("Unknown")
                .tax_sum(dec!(21.88))
                .tax_description("Unknown"),
        )
        .add_item(item)
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn punchout_setup_response_renders_both_blocks_in_addition_order() {
    let mut cxml = envelope();
    cxml.add_response(Status::new()).unwrap();
    cxml.add_response(
        PunchOutSetupResponse::new("https://www.example.com/punchout?sid=76857247543634381")
            .unwrap(),
    )
    .unwrap();

    let xml = cxml.render().unwrap();

    assert!(xml.contains("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("cXML SYSTEM \"http://xml.cxml.org/schemas/cXML/1.2.014/cXML.dtd\""));
    assert!(xml.contains("payloadID=\"1539050765.83749@example.com\""));
    assert!(xml.contains("timestamp=\"2018-04-07T16:16:53-05:00\""));
    assert!(xml.contains(r#"<Status code="200" text="OK"/>"#));
    // The URL carries no reserved characters and must stay literal.
    assert!(xml.contains("<URL>https://www.example.com/punchout?sid=76857247543634381</URL>"));

    let status_pos = xml.find("<Status").unwrap();
    let setup_pos = xml.find("<PunchOutSetupResponse>").unwrap();
    assert!(status_pos < setup_pos, "responses must render in addition order");
}

#[test]
fn responses_share_a_single_response_wrapper() {
    let mut cxml = envelope();
    cxml.add_response(Status::new()).unwrap();
    cxml.add_response(PunchOutSetupResponse::new("https://example.com/s").unwrap())
        .unwrap();

    let xml = cxml.render().unwrap();
    assert_eq!(xml.matches("<Response>").count(), 1);
    assert_eq!(xml.matches("</Response>").count(), 1);
}

// ---------------------------------------------------------------------------
// Order message
// ---------------------------------------------------------------------------

#[test]
fn order_message_renders_item_with_money_and_legacy_classification() {
    let mut cxml = envelope();
    cxml.set_header(Header::new());
    cxml.set_message(sample_order_message()).unwrap();

    let xml = cxml.render().unwrap();

    assert!(xml.contains("<BuyerCookie>f5d75ddbc9e75b6346b36ee5c28c5e8b</BuyerCookie>"));
    assert!(xml.contains("<ItemIn quantity=\"1\">"));
    assert!(xml.contains("<SupplierPartID>AM2692</SupplierPartID>"));
    assert!(xml.contains(r#"<Money currency="EUR">250.00</Money>"#));
    assert!(xml.contains(r#"<Description xml:lang="de-DE">ANTI-RNase (15-30 U/ul)</Description>"#));
    assert!(xml.contains("<UnitOfMeasure>EA</UnitOfMeasure>"));
    assert!(xml.contains(r#"<Classification domain="UNSPSC">41106104</Classification>"#));
    assert!(xml.contains("<ManufacturerPartID>MFPART-1</ManufacturerPartID>"));
    assert!(xml.contains("<ManufacturerName>Manufacturer X</ManufacturerName>"));
    assert!(xml.contains("<LeadTime>14</LeadTime>"));
    assert_eq!(xml.matches("<Classification").count(), 1);
}

#[test]
fn order_message_totals_render_with_message_currency() {
    let mut cxml = envelope();
    cxml.set_header(Header::new());
    cxml.set_message(sample_order_message()).unwrap();

    let xml = cxml.render().unwrap();

    assert!(xml.contains(r#"operationAllowed="create""#));
    assert!(xml.contains(r#"<Money currency="EUR">271.88</Money>"#));
    assert!(xml.contains(r#"<Money currency="EUR">0.00</Money>"#));
    assert!(xml.contains(r#"<Money currency="EUR">21.88</Money>"#));
}

#[test]
fn header_defaults_unset_fields_to_unknown() {
    let mut cxml = envelope();
    cxml.set_header(Header::new());
    cxml.set_message(sample_order_message()).unwrap();

    let xml = cxml.render().unwrap();

    // From, To, and Sender identities all default; so does the user agent.
    assert_eq!(xml.matches("<Identity>Unknown</Identity>").count(), 3);
    assert!(xml.contains("<UserAgent>Unknown</UserAgent>"));
    assert!(xml.contains(r#"<Credential domain="">"#));
}

#[test]
fn items_render_in_addition_order() {
    let first = ItemIn::new(1, "SKU-FIRST").unwrap().unit_price(dec!(1));
    let second = ItemIn::new(2, "SKU-SECOND").unwrap().unit_price(dec!(2));

    let message = PunchOutOrderMessage::new("cookie", "EUR", "de-DE")
        .unwrap()
        .header(PunchOutOrderMessageHeader::new(dec!(5)))
        .add_item(first)
        .add_item(second);

    let mut cxml = envelope();
    cxml.set_message(message).unwrap();
    let xml = cxml.render().unwrap();

    let first_pos = xml.find("SKU-FIRST").unwrap();
    let second_pos = xml.find("SKU-SECOND").unwrap();
    assert!(first_pos < second_pos);
}

// ---------------------------------------------------------------------------
// Classification policy
// ---------------------------------------------------------------------------

fn message_with_item(item: ItemIn) -> CXml {
    let message = PunchOutOrderMessage::new("test-cookie", "PLN", "pl-PL")
        .unwrap()
        .header(
            PunchOutOrderMessageHeader::new(dec!(100))
                .shipping_cost(dec!(10))
                .shipping_description("Shipping")
                .tax_sum(dec!(23))
                .tax_description("VAT"),
        )
        .add_item(item);

    let mut cxml = envelope();
    cxml.set_header(Header::new());
    cxml.set_message(message).unwrap();
    cxml
}

#[test]
fn multiple_classifications_render_one_element_per_domain() {
    let item = ItemIn::new(1, "TEST-SKU")
        .unwrap()
        .unit_price(dec!(100))
        .description("Test Product")
        .unit_of_measure("EA")
        .add_classification("UNSPSC", "41106104")
        .add_classification("EAN", "5901234567890");

    let xml = message_with_item(item).render().unwrap();

    assert!(xml.contains(r#"<Classification domain="UNSPSC">41106104</Classification>"#));
    assert!(xml.contains(r#"<Classification domain="EAN">5901234567890</Classification>"#));
}

#[test]
fn mapping_takes_precedence_over_legacy_pair() {
    let item = ItemIn::new(1, "TEST-SKU")
        .unwrap()
        .unit_price(dec!(100))
        .classification_domain("EAN")
        .classification("legacy-value")
        .add_classification("UNSPSC", "41106104");

    let xml = message_with_item(item).render().unwrap();

    assert!(xml.contains(r#"<Classification domain="UNSPSC">41106104</Classification>"#));
    assert!(!xml.contains("legacy-value"));
    assert_eq!(xml.matches("<Classification").count(), 1);
}

#[test]
fn legacy_pair_renders_only_when_mapping_is_empty() {
    let item = ItemIn::new(1, "LEGACY-SKU")
        .unwrap()
        .unit_price(dec!(100))
        .description("Legacy Product")
        .unit_of_measure("EA")
        .classification_domain("EAN")
        .classification("1234567890");

    let xml = message_with_item(item).render().unwrap();

    assert!(xml.contains(r#"<Classification domain="EAN">1234567890</Classification>"#));
    assert_eq!(xml.matches("<Classification").count(), 1);
}

#[test]
fn half_set_legacy_pair_renders_nothing() {
    let item = ItemIn::new(1, "TEST-SKU")
        .unwrap()
        .unit_price(dec!(100))
        .classification("41106104"); // domain never set

    let xml = message_with_item(item).render().unwrap();
    assert!(!xml.contains("<Classification"));
}

#[test]
fn classifications_keep_insertion_order_not_lexical_order() {
    let item = ItemIn::new(1, "TEST-SKU")
        .unwrap()
        .unit_price(dec!(100))
        .add_classification("ZZZ", "1")
        .add_classification("AAA", "2")
        .add_classification("MMM", "3");

    let xml = message_with_item(item).render().unwrap();

    let zzz = xml.find(r#"domain="ZZZ""#).unwrap();
    let aaa = xml.find(r#"domain="AAA""#).unwrap();
    let mmm = xml.find(r#"domain="MMM""#).unwrap();
    assert!(zzz < aaa && aaa < mmm);
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

#[test]
fn free_text_is_escaped_on_render() {
    let item = ItemIn::new(1, "TEST-SKU")
        .unwrap()
        .unit_price(dec!(100))
        .description("Tubes <0.5 ml> & \"caps\"")
        .supplier_part_auxiliary_id("a&b")
        .add_classification("UNSPSC", "41<10");

    let xml = message_with_item(item).render().unwrap();

    assert!(xml.contains("Tubes &lt;0.5 ml&gt; &amp; &quot;caps&quot;"));
    assert!(xml.contains("<SupplierPartAuxiliaryID>a&amp;b</SupplierPartAuxiliaryID>"));
    assert!(xml.contains("41&lt;10"));
    assert!(!xml.contains("Tubes <0.5"));
}

// ---------------------------------------------------------------------------
// Required-field failures
// ---------------------------------------------------------------------------

#[test]
fn item_without_unit_price_fails_at_render() {
    let item = ItemIn::new(1, "TEST-SKU").unwrap();
    let err = message_with_item(item).render().unwrap_err();
    assert!(matches!(
        err,
        CxmlError::MissingRequiredField("ItemIn/UnitPrice")
    ));
}

#[test]
fn timestamp_offset_is_preserved_verbatim() {
    let cxml = {
        let mut c = envelope();
        c.add_response(Status::new()).unwrap();
        c
    };
    let xml = cxml.render().unwrap();

    assert!(xml.contains("2018-04-07T16:16:53-05:00"));
    assert!(!xml.contains("21:16:53")); // not normalized to UTC
    assert_eq!(timestamp_of(&cxml).offset().local_minus_utc(), -5 * 3600);
}
