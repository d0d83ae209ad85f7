use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CxmlError;
use super::item::ItemIn;
use crate::xml::XmlWriter;

/// Order totals block of a punch-out order message.
///
/// Monetary figures render with the owning message's currency; the shipping
/// and tax blocks are emitted only when their amount is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchOutOrderMessageHeader {
    total_amount: Decimal,
    shipping_cost: Option<Decimal>,
    shipping_description: Option<String>,
    tax_sum: Option<Decimal>,
    tax_description: Option<String>,
    operation_allowed: String,
}

impl PunchOutOrderMessageHeader {
    pub fn new(total_amount: Decimal) -> Self {
        Self {
            total_amount,
            shipping_cost: None,
            shipping_description: None,
            tax_sum: None,
            tax_description: None,
            operation_allowed: "create".to_string(),
        }
    }

    pub fn shipping_cost(mut self, cost: Decimal) -> Self {
        self.shipping_cost = Some(cost);
        self
    }

    pub fn shipping_description(mut self, description: impl Into<String>) -> Self {
        self.shipping_description = Some(description.into());
        self
    }

    pub fn tax_sum(mut self, sum: Decimal) -> Self {
        self.tax_sum = Some(sum);
        self
    }

    pub fn tax_description(mut self, description: impl Into<String>) -> Self {
        self.tax_description = Some(description.into());
        self
    }

    /// cXML `operationAllowed` attribute (`"create"`, `"edit"` or
    /// `"inspect"`). Defaults to `"create"`.
    pub fn operation_allowed(mut self, operation: impl Into<String>) -> Self {
        self.operation_allowed = operation.into();
        self
    }

    pub fn get_total_amount(&self) -> Decimal {
        self.total_amount
    }

    fn render(&self, w: &mut XmlWriter, currency: &str, locale: &str) -> Result<(), CxmlError> {
        w.start_element_with_attrs(
            "PunchOutOrderMessageHeader",
            &[("operationAllowed", &self.operation_allowed)],
        )?;

        w.start_element("Total")?;
        w.money_element("Money", self.total_amount, currency)?;
        w.end_element("Total")?;

        if let Some(cost) = self.shipping_cost {
            w.start_element("Shipping")?;
            w.money_element("Money", cost, currency)?;
            if let Some(description) = &self.shipping_description {
                w.text_element_with_attrs("Description", description, &[("xml:lang", locale)])?;
            }
            w.end_element("Shipping")?;
        }

        if let Some(sum) = self.tax_sum {
            w.start_element("Tax")?;
            w.money_element("Money", sum, currency)?;
            if let Some(description) = &self.tax_description {
                w.text_element_with_attrs("Description", description, &[("xml:lang", locale)])?;
            }
            w.end_element("Tax")?;
        }

        w.end_element("PunchOutOrderMessageHeader")?;
        Ok(())
    }
}

/// A punch-out order message: the cart a buyer brings back from the
/// supplier's catalog.
///
/// Owns the message header and an ordered item sequence. Currency and locale
/// live here and are handed to every item render — items carry none of
/// their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchOutOrderMessage {
    buyer_cookie: String,
    currency: String,
    locale: String,
    header: Option<PunchOutOrderMessageHeader>,
    items: Vec<ItemIn>,
}

impl PunchOutOrderMessage {
    /// Create a message. The buyer cookie, ISO 4217 currency code, and
    /// locale tag are all required to be non-empty.
    pub fn new(
        buyer_cookie: impl Into<String>,
        currency: impl Into<String>,
        locale: impl Into<String>,
    ) -> Result<Self, CxmlError> {
        let buyer_cookie = buyer_cookie.into();
        if buyer_cookie.is_empty() {
            return Err(CxmlError::invalid("buyer_cookie", "must not be empty"));
        }
        let currency = currency.into();
        if currency.is_empty() {
            return Err(CxmlError::invalid("currency", "must not be empty"));
        }
        let locale = locale.into();
        if locale.is_empty() {
            return Err(CxmlError::invalid("locale", "must not be empty"));
        }
        Ok(Self {
            buyer_cookie,
            currency,
            locale,
            header: None,
            items: Vec::new(),
        })
    }

    pub fn header(mut self, header: PunchOutOrderMessageHeader) -> Self {
        self.header = Some(header);
        self
    }

    /// Append an item; insertion order is render order.
    pub fn add_item(mut self, item: ItemIn) -> Self {
        self.items.push(item);
        self
    }

    pub fn get_buyer_cookie(&self) -> &str {
        &self.buyer_cookie
    }

    pub fn get_currency(&self) -> &str {
        &self.currency
    }

    pub fn get_locale(&self) -> &str {
        &self.locale
    }

    pub fn get_header(&self) -> Option<&PunchOutOrderMessageHeader> {
        self.header.as_ref()
    }

    pub fn get_items(&self) -> &[ItemIn] {
        &self.items
    }

    pub(crate) fn render(&self, w: &mut XmlWriter) -> Result<(), CxmlError> {
        let header = self.header.as_ref().ok_or(CxmlError::MissingRequiredField(
            "PunchOutOrderMessage/PunchOutOrderMessageHeader",
        ))?;

        w.start_element("Message")?;
        w.start_element("PunchOutOrderMessage")?;
        w.text_element("BuyerCookie", &self.buyer_cookie)?;

        header.render(w, &self.currency, &self.locale)?;

        for item in &self.items {
            item.render(w, &self.currency, &self.locale)?;
        }

        w.end_element("PunchOutOrderMessage")?;
        w.end_element("Message")?;
        Ok(())
    }
}
