use std::io;

/// Failures reported by a drawing surface.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// Image bytes are not a JPEG or PNG the surface can embed.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),
    /// A buffered page was addressed that does not exist.
    #[error("page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },
    /// The surface could not measure a string.
    #[error("text measurement unavailable: {0}")]
    MeasurementUnavailable(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
