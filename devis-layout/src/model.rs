//! Typed inputs to the document composer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{LayoutError, Result};
use crate::quantity::QuantityUnit;

/// Which document is being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Invoice,
    #[serde(alias = "devis", alias = "quote")]
    Estimate,
}

impl DocumentKind {
    /// Title printed at the top of the first page.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "FACTURE",
            DocumentKind::Estimate => "DEVIS",
        }
    }
}

/// One priced line of a document. Read-only to the layout engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineItem {
    pub description: String,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default, alias = "qty_unit")]
    pub quantity_unit: QuantityUnit,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default, alias = "tva")]
    pub tax_rate_percent: Decimal,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        quantity_unit: QuantityUnit,
        unit_price: Decimal,
        tax_rate_percent: Decimal,
    ) -> Self {
        LineItem {
            description: description.into(),
            quantity,
            quantity_unit,
            unit_price,
            tax_rate_percent,
        }
    }

    /// Tax-exclusive amount of this line, unrounded.
    pub fn amount_ht(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    /// Tax owed on this line, unrounded.
    pub fn amount_tva(&self) -> Decimal {
        self.amount_ht() * self.tax_rate_percent / Decimal::ONE_HUNDRED
    }

    pub(crate) fn validate(&self, index: usize) -> Result<()> {
        if self.unit_price.is_sign_negative() && !self.unit_price.is_zero() {
            return Err(LayoutError::out_of_range(
                &format!("item {} unit price", index),
                self.unit_price,
            ));
        }
        if self.tax_rate_percent < Decimal::ZERO || self.tax_rate_percent > Decimal::ONE_HUNDRED {
            return Err(LayoutError::out_of_range(
                &format!("item {} tax rate", index),
                self.tax_rate_percent,
            ));
        }
        Ok(())
    }
}

/// The customer a document is addressed to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Client {
    /// Name to print; a missing name reads "Client".
    pub fn display_name(&self) -> &str {
        match self.name.trim() {
            "" => "Client",
            name => name,
        }
    }
}

/// Identification printed in the document header.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeaderInfo {
    pub doc_number: String,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    /// Work site the document relates to ("Chantier").
    #[serde(default)]
    pub project: Option<String>,
}

impl HeaderInfo {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.doc_number.trim().is_empty() {
            return Err(LayoutError::malformed("document number is blank"));
        }
        Ok(())
    }
}

/// A complete render request, as read by the command-line tool.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInput {
    pub kind: DocumentKind,
    pub header: HeaderInfo,
    #[serde(default)]
    pub client: Client,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn deserializes_front_end_field_names() {
        let json = r#"{
            "description": "Pose de prises",
            "quantity": 3,
            "qty_unit": "ensemble",
            "unit_price": "12.50",
            "tva": 20
        }"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity, dec!(3));
        assert_eq!(item.quantity_unit, QuantityUnit::Set);
        assert_eq!(item.unit_price, dec!(12.50));
        assert_eq!(item.tax_rate_percent, dec!(20));
    }

    #[test]
    fn missing_amounts_default_to_zero() {
        let item: LineItem = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert!(item.quantity.is_zero());
        assert!(item.unit_price.is_zero());
        assert_eq!(item.quantity_unit, QuantityUnit::Unit);
    }

    #[test]
    fn line_amounts() {
        let item = LineItem::new("x", dec!(4), QuantityUnit::Unit, dec!(2.5), dec!(20));
        assert_eq!(item.amount_ht(), dec!(10));
        assert_eq!(item.amount_tva(), dec!(2));
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let negative = LineItem::new("x", dec!(1), QuantityUnit::Unit, dec!(-1), dec!(20));
        assert!(negative.validate(0).is_err());
        let too_much_tax = LineItem::new("x", dec!(1), QuantityUnit::Unit, dec!(1), dec!(120));
        assert!(too_much_tax.validate(0).is_err());
        let ok = LineItem::new("x", dec!(0), QuantityUnit::Unit, dec!(0), dec!(0));
        assert!(ok.validate(0).is_ok());
    }

    #[test]
    fn blank_client_name_reads_client() {
        assert_eq!(Client::default().display_name(), "Client");
    }

    #[test]
    fn kind_accepts_devis_alias() {
        let kind: DocumentKind = serde_json::from_str(r#""devis""#).unwrap();
        assert_eq!(kind, DocumentKind::Estimate);
    }
}
