pub mod document;
pub mod error;
pub mod fonts;
pub mod graphics;
pub mod images;
pub mod objects;
pub mod surface;
pub mod writer;

pub use document::{PdfSurface, LETTER};
pub use error::SurfaceError;
pub use fonts::{BuiltinFont, FontMetrics};
pub use graphics::{Color, TextStyle};
pub use surface::DrawingSurface;
