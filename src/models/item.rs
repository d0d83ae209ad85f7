use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CxmlError;
use crate::xml::XmlWriter;

/// One purchasable line item of a punch-out order message.
///
/// Quantity and supplier part id are validated at construction; everything
/// else is optional and omitted from the output when unset. Currency and
/// locale are not item state — the owning message passes its own down at
/// render time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemIn {
    quantity: u32,
    supplier_part_id: String,
    supplier_part_auxiliary_id: Option<String>,
    unit_price: Option<Decimal>,
    description: Option<String>,
    unit_of_measure: Option<String>,
    /// Multi-domain classifications, `(domain, value)` in insertion order.
    classifications: Vec<(String, String)>,
    /// Deprecated single-classification pair, kept for integrations that
    /// predate [`ItemIn::add_classification`].
    legacy_classification: Option<String>,
    legacy_classification_domain: Option<String>,
    manufacturer_part_id: Option<String>,
    manufacturer_name: Option<String>,
    lead_time: Option<u32>,
}

impl ItemIn {
    /// Create a line item. Rejects a zero quantity and an empty supplier
    /// part id so invalid state never exists in memory.
    pub fn new(quantity: u32, supplier_part_id: impl Into<String>) -> Result<Self, CxmlError> {
        if quantity == 0 {
            return Err(CxmlError::invalid("quantity", "must be at least 1"));
        }
        let supplier_part_id = supplier_part_id.into();
        if supplier_part_id.is_empty() {
            return Err(CxmlError::invalid("supplier_part_id", "must not be empty"));
        }
        Ok(Self {
            quantity,
            supplier_part_id,
            supplier_part_auxiliary_id: None,
            unit_price: None,
            description: None,
            unit_of_measure: None,
            classifications: Vec::new(),
            legacy_classification: None,
            legacy_classification_domain: None,
            manufacturer_part_id: None,
            manufacturer_name: None,
            lead_time: None,
        })
    }

    /// Opaque id used by the supplier to restore a cart or order.
    pub fn supplier_part_auxiliary_id(mut self, id: impl Into<String>) -> Self {
        self.supplier_part_auxiliary_id = Some(id.into());
        self
    }

    pub fn unit_price(mut self, price: Decimal) -> Self {
        self.unit_price = Some(price);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// UN/CEFACT unit code, e.g. `"EA"` for each.
    pub fn unit_of_measure(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measure = Some(unit.into());
        self
    }

    /// Add a classification under a named domain (e.g. `"UNSPSC"`, `"EAN"`).
    ///
    /// An empty value is silently dropped, never stored. Re-adding a domain
    /// overwrites its value in place, keeping the original insertion
    /// position so output stays deterministic.
    pub fn add_classification(mut self, domain: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            return self;
        }
        let domain = domain.into();
        if let Some(entry) = self.classifications.iter_mut().find(|(d, _)| *d == domain) {
            entry.1 = value;
        } else {
            self.classifications.push((domain, value));
        }
        self
    }

    /// Legacy single classification value.
    #[deprecated(note = "use add_classification instead")]
    pub fn classification(mut self, value: impl Into<String>) -> Self {
        self.legacy_classification = Some(value.into());
        self
    }

    /// Legacy single classification domain.
    #[deprecated(note = "use add_classification instead")]
    pub fn classification_domain(mut self, domain: impl Into<String>) -> Self {
        self.legacy_classification_domain = Some(domain.into());
        self
    }

    pub fn manufacturer_part_id(mut self, id: impl Into<String>) -> Self {
        self.manufacturer_part_id = Some(id.into());
        self
    }

    pub fn manufacturer_name(mut self, name: impl Into<String>) -> Self {
        self.manufacturer_name = Some(name.into());
        self
    }

    /// Lead time in days.
    pub fn lead_time(mut self, days: u32) -> Self {
        self.lead_time = Some(days);
        self
    }

    pub fn get_quantity(&self) -> u32 {
        self.quantity
    }

    pub fn get_supplier_part_id(&self) -> &str {
        &self.supplier_part_id
    }

    pub fn get_unit_price(&self) -> Option<Decimal> {
        self.unit_price
    }

    /// All classifications in insertion order.
    pub fn get_classifications(&self) -> &[(String, String)] {
        &self.classifications
    }

    pub(crate) fn render(
        &self,
        w: &mut XmlWriter,
        currency: &str,
        locale: &str,
    ) -> Result<(), CxmlError> {
        let quantity = self.quantity.to_string();
        w.start_element_with_attrs("ItemIn", &[("quantity", &quantity)])?;

        w.start_element("ItemID")?;
        w.text_element("SupplierPartID", &self.supplier_part_id)?;
        if let Some(aux) = &self.supplier_part_auxiliary_id {
            w.text_element("SupplierPartAuxiliaryID", aux)?;
        }
        w.end_element("ItemID")?;

        w.start_element("ItemDetail")?;

        let price = self
            .unit_price
            .ok_or(CxmlError::MissingRequiredField("ItemIn/UnitPrice"))?;
        w.start_element("UnitPrice")?;
        w.money_element("Money", price, currency)?;
        w.end_element("UnitPrice")?;

        if let Some(description) = &self.description {
            w.text_element_with_attrs("Description", description, &[("xml:lang", locale)])?;
        }
        if let Some(unit) = &self.unit_of_measure {
            w.text_element("UnitOfMeasure", unit)?;
        }

        self.render_classifications(w)?;

        if let Some(id) = &self.manufacturer_part_id {
            w.text_element("ManufacturerPartID", id)?;
        }
        if let Some(name) = &self.manufacturer_name {
            w.text_element("ManufacturerName", name)?;
        }
        if let Some(days) = self.lead_time {
            w.text_element("LeadTime", &days.to_string())?;
        }

        w.end_element("ItemDetail")?;
        w.end_element("ItemIn")?;
        Ok(())
    }

    /// Multi-domain classifications win whenever any are present; the legacy
    /// pair renders only as a fallback when the mapping is empty and both
    /// legacy fields are set. The two paths never both emit.
    fn render_classifications(&self, w: &mut XmlWriter) -> Result<(), CxmlError> {
        if !self.classifications.is_empty() {
            for (domain, value) in &self.classifications {
                w.text_element_with_attrs("Classification", value, &[("domain", domain)])?;
            }
            return Ok(());
        }

        if let (Some(value), Some(domain)) = (
            &self.legacy_classification,
            &self.legacy_classification_domain,
        ) {
            w.text_element_with_attrs("Classification", value, &[("domain", domain)])?;
        }
        Ok(())
    }
}
