use pdf_surface::{BuiltinFont, SurfaceError};

use crate::config::{ColumnRole, LayoutConfig};
use crate::error::{LayoutError, Result};
use crate::model::LineItem;
use crate::quantity::format_quantity;
use crate::totals::format_amount;
use crate::wrap::try_wrap;

/// Pre-formatted numeric cells of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCells {
    pub qty_text: String,
    pub unit_price_text: String,
    pub tax_text: String,
    pub total_text: String,
}

impl RowCells {
    /// Text for a column, or `None` for the description column.
    pub fn text_for(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::Description => None,
            ColumnRole::Quantity => Some(&self.qty_text),
            ColumnRole::UnitPrice => Some(&self.unit_price_text),
            ColumnRole::TaxRate => Some(&self.tax_text),
            ColumnRole::Total => Some(&self.total_text),
        }
    }
}

/// One line item, wrapped and measured, ready to place.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedRow {
    /// Description lines; never empty.
    pub lines: Vec<String>,
    pub height: f64,
    pub cells: RowCells,
}

/// Turns line items into [`WrappedRow`]s under a fixed geometry.
pub struct RowBuilder<'a> {
    config: &'a LayoutConfig,
}

impl<'a> RowBuilder<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        RowBuilder { config }
    }

    /// Width available to description text inside its cell.
    pub fn text_width(&self) -> f64 {
        self.config.description_column().width - 2.0 * self.config.cell_padding
    }

    /// Height of a row holding `line_count` description lines.
    pub fn row_height(&self, line_count: usize) -> f64 {
        let extra = line_count.saturating_sub(1) as f64;
        self.config.base_row_height + extra * self.config.continuation_line_height
    }

    /// Build the row for `item`. `measure` returns the width of a string
    /// in the table's body font.
    pub fn build<M>(&self, item: &LineItem, mut measure: M) -> Result<WrappedRow>
    where
        M: FnMut(&str, BuiltinFont, f64) -> std::result::Result<f64, SurfaceError>,
    {
        let font_size = self.config.font_size;
        let lines = try_wrap(&item.description, self.text_width(), |s| {
            measure(s, BuiltinFont::Helvetica, font_size)
        })
        .map_err(LayoutError::MeasurementUnavailable)?;

        let cells = RowCells {
            qty_text: format_quantity(item.quantity, item.quantity_unit),
            unit_price_text: format_amount(item.unit_price),
            tax_text: format!("{}%", format_amount(item.tax_rate_percent)),
            total_text: format_amount(item.amount_ht()),
        };
        Ok(WrappedRow {
            height: self.row_height(lines.len()),
            lines,
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::QuantityUnit;
    use pdf_surface::FontMetrics;
    use rust_decimal_macros::dec;

    fn afm(text: &str, font: BuiltinFont, size: f64) -> std::result::Result<f64, SurfaceError> {
        Ok(FontMetrics::measure_text(text, font, size))
    }

    #[test]
    fn short_description_is_one_base_row() {
        let config = LayoutConfig::default();
        let item = LineItem::new(
            "Pose de prises murales dans la cuisine et le salon",
            dec!(3),
            QuantityUnit::Unit,
            dec!(45),
            dec!(20),
        );
        let row = RowBuilder::new(&config).build(&item, afm).unwrap();
        assert_eq!(row.lines.len(), 1);
        assert_eq!(row.height, 20.0);
        assert_eq!(row.cells.qty_text, "3 units");
        assert_eq!(row.cells.unit_price_text, "45.00");
        assert_eq!(row.cells.tax_text, "20.00%");
        assert_eq!(row.cells.total_text, "135.00");
    }

    #[test]
    fn long_description_grows_the_row() {
        let config = LayoutConfig::default();
        let description = "Fourniture et pose d'un tableau électrique complet avec \
                           disjoncteurs différentiels, repérage des circuits, mise à la \
                           terre et contrôle de conformité avant mise en service";
        let item = LineItem::new(description, dec!(1), QuantityUnit::Set, dec!(1200), dec!(10));
        let builder = RowBuilder::new(&config);
        let row = builder.build(&item, afm).unwrap();
        assert!(row.lines.len() > 1);
        assert_eq!(row.height, builder.row_height(row.lines.len()));
        for line in &row.lines {
            assert!(FontMetrics::measure_text(line, BuiltinFont::Helvetica, 9.0) <= 240.0);
        }
    }

    #[test]
    fn zero_amounts_render_as_zero() {
        let config = LayoutConfig::default();
        let item = LineItem::new("", dec!(0), QuantityUnit::Meter, dec!(0), dec!(0));
        let row = RowBuilder::new(&config).build(&item, afm).unwrap();
        assert_eq!(row.lines, vec![String::new()]);
        assert_eq!(row.cells.qty_text, "0 m");
        assert_eq!(row.cells.total_text, "0.00");
        assert_eq!(row.cells.tax_text, "0.00%");
    }

    #[test]
    fn measurement_failure_is_reported() {
        let config = LayoutConfig::default();
        let item = LineItem::new("two words", dec!(1), QuantityUnit::Unit, dec!(1), dec!(0));
        let err = RowBuilder::new(&config)
            .build(&item, |_, _, _| {
                Err(SurfaceError::MeasurementUnavailable("no metrics".into()))
            })
            .unwrap_err();
        assert!(matches!(err, LayoutError::MeasurementUnavailable(_)));
    }

    #[test]
    fn cell_lookup_by_role() {
        let cells = RowCells {
            qty_text: "1 unit".into(),
            unit_price_text: "2.00".into(),
            tax_text: "20.00%".into(),
            total_text: "2.00".into(),
        };
        assert_eq!(cells.text_for(ColumnRole::Description), None);
        assert_eq!(cells.text_for(ColumnRole::Total), Some("2.00"));
    }
}
