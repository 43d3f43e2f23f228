use crate::error::SurfaceError;
use crate::fonts::BuiltinFont;
use crate::graphics::{Color, TextStyle};

/// Drawing primitives a page layout engine renders through.
///
/// Coordinates use PDF's bottom-left origin, in points. A surface starts
/// with one open page; `start_new_page` appends another and makes it the
/// drawing target. Pages stay buffered and may be revisited with
/// `open_page` until `finalize_and_emit` serializes them in order.
pub trait DrawingSurface {
    /// Width of `text` in points.
    fn measure_text(
        &self,
        text: &str,
        font: BuiltinFont,
        font_size: f64,
    ) -> Result<f64, SurfaceError>;

    /// Draw a single line of text with its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);

    /// Stroke a straight line.
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);

    /// Fill an axis-aligned rectangle whose lower-left corner is `(x, y)`.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    /// Place a JPEG or PNG image scaled into the given box.
    fn draw_image(
        &mut self,
        bytes: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), SurfaceError>;

    /// Append a new page and make it the drawing target.
    fn start_new_page(&mut self);

    /// Number of pages buffered so far, including the current one.
    fn page_count(&self) -> usize;

    /// Zero-based index of the page currently receiving draw calls.
    fn current_page(&self) -> usize;

    /// Retarget drawing at an already buffered page.
    fn open_page(&mut self, index: usize) -> Result<(), SurfaceError>;

    /// Page width and height in points.
    fn page_size(&self) -> (f64, f64);

    /// Serialize every buffered page, in order, and return the document bytes.
    fn finalize_and_emit(self) -> Result<Vec<u8>, SurfaceError>
    where
        Self: Sized;
}
