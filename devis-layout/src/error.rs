//! Error taxonomy for document layout.
//!
//! Every variant aborts the current render. Callers receive either a
//! finished document or one of these, never a partially laid-out file.

use pdf_surface::SurfaceError;
use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// Configuration or input that can never be laid out (negative column
    /// widths, widths not adding up to the table width, a blank document
    /// number, tax rates outside 0..=100).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A single row is taller than the row area of a whole page.
    #[error("row {index} needs {height}pt but a page only holds {available}pt of rows")]
    UnrepresentableRow {
        index: usize,
        height: f64,
        available: f64,
    },

    /// The drawing surface could not measure text.
    #[error("text measurement unavailable: {0}")]
    MeasurementUnavailable(#[source] SurfaceError),

    /// Drawing or serialization failed on the surface.
    #[error("drawing surface error: {0}")]
    Surface(#[from] SurfaceError),

    /// The layout configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl LayoutError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        LayoutError::MalformedInput(msg.into())
    }

    pub(crate) fn out_of_range(field: &str, value: Decimal) -> Self {
        LayoutError::MalformedInput(format!("{} out of range: {}", field, value))
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
