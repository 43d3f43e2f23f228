//! Page footers, drawn once the final page count is known.
//!
//! Layout appends a [`FooterRecord`] each time a page is completed. When the
//! document is saved, [`FooterLog::finalize`] re-opens every buffered page on
//! the surface and stamps `"{doc_number} · {k}/{total}"` on it.

use pdf_surface::{BuiltinFont, Color, DrawingSurface, TextStyle};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterRecord {
    pub doc_number: String,
    pub footer_left_text: String,
    pub page_index: usize,
}

impl FooterRecord {
    /// Right-hand footer text for page `k` (1-based) of `total`.
    pub fn page_label(&self, k: usize, total: usize) -> String {
        format!("{} · {}/{}", self.doc_number, k, total)
    }
}

/// Append-only arena of footer records, consumed by [`FooterLog::finalize`].
#[derive(Debug, Default)]
pub struct FooterLog {
    records: Vec<FooterRecord>,
}

impl FooterLog {
    pub fn new() -> Self {
        FooterLog::default()
    }

    pub fn capture(&mut self, doc_number: &str, footer_left_text: &str, page_index: usize) {
        self.records.push(FooterRecord {
            doc_number: doc_number.to_string(),
            footer_left_text: footer_left_text.to_string(),
            page_index,
        });
    }

    /// Draw every footer on its page and return the page count. Fails if
    /// the records do not cover exactly the pages buffered on `surface`.
    pub fn finalize<S: DrawingSurface>(self, surface: &mut S, config: &LayoutConfig) -> Result<usize> {
        let total = self.records.len();
        if total != surface.page_count() {
            return Err(LayoutError::malformed(format!(
                "{} footer records for {} pages",
                total,
                surface.page_count()
            )));
        }
        let style = TextStyle::regular(config.footer_font_size).with_color(Color::gray(0.3));
        for (k, record) in self.records.iter().enumerate() {
            if record.page_index != k {
                return Err(LayoutError::malformed(format!(
                    "footer record {} points at page {}",
                    k, record.page_index
                )));
            }
            surface.open_page(record.page_index)?;

            let label = record.page_label(k + 1, total);
            let width = surface
                .measure_text(&label, BuiltinFont::Helvetica, config.footer_font_size)
                .map_err(LayoutError::MeasurementUnavailable)?;
            surface.draw_text(&label, config.table_right() - width, config.footer_y, &style);
            if !record.footer_left_text.is_empty() {
                surface.draw_text(
                    &record.footer_left_text,
                    config.margin_left,
                    config.footer_y,
                    &style,
                );
            }
        }
        debug!(pages = total, "footers stamped");
        Ok(total)
    }
}
