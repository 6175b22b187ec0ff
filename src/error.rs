//! Error and diagnostic types.
//!
//! Only [`Error`] aborts a render. Everything else degrades a single layer
//! and is reported back as a [`RenderWarning`] on the render output.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that stop a render or an export.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by the color blender.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Blend percent {0} is outside [-1, 1]")]
    PercentOutOfRange(f64),
}

/// Errors raised while turning user input into a decoded raster.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageInputError {
    #[error("Input is not an image (content type: {content_type})")]
    NotAnImage { content_type: String },

    #[error("Failed to decode image: {0}")]
    Decode(String),
}

/// A non-fatal condition that caused a layer to be skipped or drawn with a
/// fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderWarning {
    #[error("Invalid {field} color {value:?}, drawing with the default fill")]
    InvalidColor { field: &'static str, value: String },

    #[error("Shadow tint unavailable, hard shadows skipped")]
    ShadowTintUnavailable,

    #[error("Unsupported version selected: {0}")]
    UnsupportedStyle(String),

    #[error("Input is not an image (content type: {content_type}), image layer skipped")]
    NotAnImage { content_type: String },

    #[error("Image decode failed, image layer skipped: {0}")]
    ImageDecode(String),

    #[error("No glyph known for icon class {0:?}")]
    GlyphNotFound(String),

    #[error("Glyph could not be rasterized, text layers skipped")]
    GlyphRasterization,
}

impl From<ImageInputError> for RenderWarning {
    fn from(err: ImageInputError) -> Self {
        match err {
            ImageInputError::NotAnImage { content_type } => Self::NotAnImage { content_type },
            ImageInputError::Decode(msg) => Self::ImageDecode(msg),
        }
    }
}
