//! Layout configuration: page geometry, table columns, supplier identity
//! and legal text.
//!
//! Every field has a default matching the stock document, so a TOML file
//! only needs the keys it overrides:
//!
//! ```toml
//! min_bottom_margin = 80
//! tax_display = { flat_rate = 20 }
//!
//! [supplier]
//! name = "Atelier Durand"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{LayoutError, Result};

/// Widths may differ from the table width by float noise only.
const WIDTH_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
}

/// What a table column displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Description,
    Quantity,
    UnitPrice,
    TaxRate,
    Total,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Column {
    pub label: String,
    pub width: f64,
    pub alignment: Alignment,
    pub role: ColumnRole,
}

impl Column {
    pub fn new(label: &str, width: f64, alignment: Alignment, role: ColumnRole) -> Self {
        Column {
            label: label.to_string(),
            width,
            alignment,
            role,
        }
    }
}

fn default_columns() -> Vec<Column> {
    vec![
        Column::new("Description", 250.0, Alignment::Left, ColumnRole::Description),
        Column::new("Qté", 70.0, Alignment::Right, ColumnRole::Quantity),
        Column::new("Prix unitaire", 100.0, Alignment::Right, ColumnRole::UnitPrice),
        Column::new("TVA (%)", 60.0, Alignment::Right, ColumnRole::TaxRate),
        Column::new("Total HT", 70.0, Alignment::Right, ColumnRole::Total),
    ]
}

/// How the tax line of the totals block is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxDisplay {
    /// Sum of each item's own tax.
    #[default]
    PerItem,
    /// One rate applied to the tax-exclusive total.
    FlatRate(Decimal),
}

/// The issuing company, printed on the left of the party block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Supplier {
    pub name: String,
    pub address_lines: Vec<String>,
    pub email: Option<String>,
    /// SIRET number.
    pub registration: Option<String>,
    pub tax_id: Option<String>,
}

impl Default for Supplier {
    fn default() -> Self {
        Supplier {
            name: "NEXT NR–GIE".to_string(),
            address_lines: vec![
                "2 Rue Des Frênes".to_string(),
                "91100 Corbeil-Essonnes, FR".to_string(),
            ],
            email: Some("nextrngie@gmail.com".to_string()),
            registration: Some("93060154700019".to_string()),
            tax_id: Some("FR26930601547".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    /// FlateDecode page content streams.
    pub compress: bool,

    /// Left edge of the header blocks and of the table.
    pub margin_left: f64,
    /// Left edge of the client block.
    pub client_x: f64,
    /// Baseline of the first header line on page one.
    pub first_page_top: f64,
    /// Table top on continuation pages.
    pub continuation_top: f64,
    /// No row or block may extend below this line.
    pub min_bottom_margin: f64,

    pub table_width: f64,
    pub columns: Vec<Column>,
    pub header_height: f64,
    pub base_row_height: f64,
    pub continuation_line_height: f64,
    pub cell_padding: f64,
    /// Distance from a row's top edge to its first baseline.
    pub baseline_offset: f64,
    pub font_size: f64,
    pub header_font_size: f64,
    /// Stroke width of table borders and row separators.
    pub rule_width: f64,

    pub supplier: Supplier,
    pub legal_text: String,
    pub footer_left_text: String,
    pub footer_y: f64,
    pub footer_font_size: f64,

    pub tax_display: TaxDisplay,
    pub currency_suffix: String,

    /// JPEG or PNG placed in the top-right corner of page one.
    pub logo_path: Option<PathBuf>,
    pub logo_width: f64,
    pub logo_height: f64,
    /// Bottom edge of the logo box.
    pub logo_y: f64,
    #[serde(skip)]
    pub logo: Option<Vec<u8>>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page_width: 612.0,
            page_height: 792.0,
            compress: true,
            margin_left: 40.0,
            client_x: 350.0,
            first_page_top: 750.0,
            continuation_top: 750.0,
            min_bottom_margin: 100.0,
            table_width: 550.0,
            columns: default_columns(),
            header_height: 20.0,
            base_row_height: 20.0,
            continuation_line_height: 11.0,
            cell_padding: 5.0,
            baseline_offset: 15.0,
            font_size: 9.0,
            header_font_size: 10.0,
            rule_width: 0.5,
            supplier: Supplier::default(),
            legal_text: "Conditions de paiement : 30 % à la commande, solde à réception \
                         de facture. Pénalités de retard au taux légal en vigueur."
                .to_string(),
            footer_left_text: "NEXT NR–GIE · SIRET 93060154700019".to_string(),
            footer_y: 30.0,
            footer_font_size: 8.0,
            tax_display: TaxDisplay::PerItem,
            currency_suffix: " €".to_string(),
            logo_path: None,
            logo_width: 150.0,
            logo_height: 55.0,
            logo_y: 700.0,
            logo: None,
        }
    }
}

impl LayoutConfig {
    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: LayoutConfig =
            toml::from_str(text).map_err(|e| LayoutError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file and the logo it points to. A relative `logo_path`
    /// is resolved against the config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| LayoutError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(logo_path) = config.logo_path.clone() {
            let resolved = match path.parent() {
                Some(dir) if logo_path.is_relative() => dir.join(&logo_path),
                _ => logo_path,
            };
            let bytes = fs::read(&resolved)
                .map_err(|e| LayoutError::Config(format!("{}: {}", resolved.display(), e)))?;
            config.logo = Some(bytes);
        }
        Ok(config)
    }

    pub fn with_logo(mut self, bytes: Vec<u8>) -> Self {
        self.logo = Some(bytes);
        self
    }

    /// Check geometry invariants. Violations are `MalformedInput`.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(LayoutError::malformed("column set is empty"));
        }
        if let Some(column) = self.columns.iter().find(|c| !(c.width >= 0.0)) {
            return Err(LayoutError::malformed(format!(
                "column {:?} has negative width {}",
                column.label, column.width
            )));
        }
        let sum: f64 = self.columns.iter().map(|c| c.width).sum();
        if (sum - self.table_width).abs() > WIDTH_TOLERANCE {
            return Err(LayoutError::malformed(format!(
                "column widths add up to {} but the table is {} wide",
                sum, self.table_width
            )));
        }
        let descriptions = self
            .columns
            .iter()
            .filter(|c| c.role == ColumnRole::Description)
            .count();
        if descriptions != 1 {
            return Err(LayoutError::malformed(format!(
                "expected one description column, found {}",
                descriptions
            )));
        }
        self.check_page_size(self.page_width, self.page_height)?;
        if self.min_bottom_margin < 0.0 {
            return Err(LayoutError::malformed("bottom margin is negative"));
        }
        let positive = [
            ("header_height", self.header_height),
            ("base_row_height", self.base_row_height),
            ("continuation_line_height", self.continuation_line_height),
            ("font_size", self.font_size),
            ("header_font_size", self.header_font_size),
            ("rule_width", self.rule_width),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(LayoutError::malformed(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }
        if self.cell_padding < 0.0 || 2.0 * self.cell_padding >= self.description_column().width {
            return Err(LayoutError::malformed(
                "cell padding leaves no room for the description",
            ));
        }
        if let TaxDisplay::FlatRate(rate) = self.tax_display {
            if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
                return Err(LayoutError::out_of_range("flat tax rate", rate));
            }
        }
        Ok(())
    }

    /// Check that the table and both page tops fit a page of the given size.
    pub fn check_page_size(&self, width: f64, height: f64) -> Result<()> {
        if self.margin_left < 0.0 || self.table_right() > width {
            return Err(LayoutError::malformed(format!(
                "table ends at {} on a page {} wide",
                self.table_right(),
                width
            )));
        }
        for (name, top) in [
            ("first_page_top", self.first_page_top),
            ("continuation_top", self.continuation_top),
        ] {
            if top > height || top <= self.min_bottom_margin {
                return Err(LayoutError::malformed(format!(
                    "{} ({}) must lie between the bottom margin ({}) and the page height ({})",
                    name, top, self.min_bottom_margin, height
                )));
            }
        }
        Ok(())
    }

    /// Left x of every column, in order, followed by the table's right edge.
    pub fn column_edges(&self) -> Vec<f64> {
        let mut edges = Vec::with_capacity(self.columns.len() + 1);
        let mut x = self.margin_left;
        edges.push(x);
        for column in &self.columns {
            x += column.width;
            edges.push(x);
        }
        edges
    }

    pub fn table_right(&self) -> f64 {
        self.margin_left + self.table_width
    }

    /// Vertical space one page offers for rows below a repeated header.
    pub fn continuation_row_capacity(&self) -> f64 {
        self.continuation_top - self.header_height - self.min_bottom_margin
    }

    pub(crate) fn description_column(&self) -> &Column {
        // validate() guarantees exactly one.
        self.columns
            .iter()
            .find(|c| c.role == ColumnRole::Description)
            .unwrap_or(&self.columns[0])
    }
}
