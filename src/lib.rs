//! badge-renderer: stylized square badge icons.
//!
//! An icon is a tinted background (a square, or a rounded square for the newer
//! styles) carrying an icon-font glyph and/or a user image. Both are drawn
//! twice: once as a long diagonal "hard shadow" in the background color
//! darkened by 40%, and once crisp on top. The rounded styles add a soft text
//! shadow, a bevel along the top and bottom edges, and a diagonal sheen.
//!
//! # Example
//!
//! ```
//! use badge_renderer::{GlyphMetrics, GlyphTable, IconSettings, RenderPipeline};
//!
//! let mut glyphs = GlyphTable::new();
//! glyphs.insert("fas fa-address-card", GlyphMetrics::new("\u{f2bb}", 900));
//!
//! let settings = IconSettings::new()
//!     .with_icon_width(128)
//!     .with_icon_background("#1f8a70")
//!     .with_style_variant("13.0");
//!
//! let mut pipeline = RenderPipeline::new(glyphs);
//! let output = pipeline.render_blocking(&settings, None).unwrap();
//!
//! let png = output.surface.to_png_bytes().unwrap();
//! assert!(!png.is_empty());
//! ```
//!
//! # Color math
//!
//! The blender behind the shadow tint is public:
//!
//! ```
//! use badge_renderer::{blend, shade, BlendMode, BlendTarget};
//!
//! assert_eq!(shade(-0.4, "#9b4dca").unwrap(), "#783c9c");
//! assert_eq!(
//!     blend(0.5, "rgb(0,0,0)", BlendTarget::Color("#ffffff"), BlendMode::Linear).unwrap(),
//!     "#808080"
//! );
//! ```

mod color;
mod config;
mod error;
mod glyph;
mod layer;
mod logging;
mod pipeline;
mod silhouette;
mod source_image;
mod surface;

pub use color::{
    blend, shade, shadow_tint, BlendMode, BlendTarget, ColorFormat, ParsedColor, SHADOW_SHADE,
};
pub use config::{
    Glyph, IconConfig, IconSettings, StyleChoice, StyleVariant, DEFAULT_FONT_COLOR,
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_WEIGHT, DEFAULT_ICON_BACKGROUND, DEFAULT_ICON_CLASS,
    DEFAULT_ICON_WIDTH, DEFAULT_IMAGE_SCALE, NO_GLYPH,
};
pub use error::{ColorError, Error, ImageInputError, RenderWarning, Result};
pub use glyph::{
    GlyphLookup, GlyphMetrics, GlyphRasterizer, GlyphStamp, GlyphTable, SvgTextRasterizer,
};
pub use layer::path::{bevel_strip, rounded_square, CanvasPath, Edge};
pub use layer::{
    cast_hard_shadow, Background, GlyphHardShadow, GradientOverlay, ImageHardShadow,
    InlineShadow, LayerCompositor, LayerStage, MainImage, PlacedImage, RenderAssets,
    RenderContext, TextWithShadow, CORNER_RADIUS_RATIO,
};
pub use layer::hard_shadow::{glyph_shadow_steps, image_shadow_steps, SHADOW_STEP};
pub use logging::{init_logging, LoggingConfig};
pub use pipeline::{RenderOutput, RenderPipeline};
pub use silhouette::{recolor, render_placed, Silhouette};
pub use source_image::{DecodedImage, FittedPlacement, ImageDecoder, ImageInput, RasterDecoder};
pub use surface::{pixmap_to_rgba_image, rgba_image_to_pixmap, RasterSurface};

/// The drawing backend, re-exported for implementors of [`GlyphRasterizer`].
pub use resvg::tiny_skia;
