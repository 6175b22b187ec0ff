//! The layer compositor.
//!
//! An icon is drawn in one synchronous pass over a fresh surface. Each stage
//! implements [`LayerStage`] and draws into the shared [`RenderContext`]; the
//! order is fixed:
//!
//! ```text
//! ┌──────────────────┐
//! │    Background    │ ◄── sets the clip every later stage draws through
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │   Hard shadow    │ ◄── glyph trail, then image silhouette trail
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │    Main image    │
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │ Text + soft shd. │
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  Inline shadow   │ ◄── bevel strips (rounded styles only)
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │     Gradient     │ ◄── rounded styles only
//! └──────────────────┘
//! ```
//!
//! The clip is the only state that outlives a stage. Paints, opacities and
//! shadow colors are local to the stage that uses them.

pub mod background;
pub mod foreground;
pub mod hard_shadow;
pub mod overlay;
pub mod path;

pub use background::Background;
pub use foreground::{MainImage, TextWithShadow};
pub use hard_shadow::{cast_hard_shadow, GlyphHardShadow, ImageHardShadow};
pub use overlay::{GradientOverlay, InlineShadow};

use resvg::tiny_skia::{Mask, Pixmap};

use crate::color::ParsedColor;
use crate::config::{IconConfig, StyleVariant};
use crate::error::{Error, RenderWarning, Result};
use crate::glyph::GlyphStamp;
use crate::silhouette::Silhouette;
use crate::source_image::FittedPlacement;
use crate::surface::RasterSurface;

/// Corner radius of rounded styles, relative to the icon width.
pub const CORNER_RADIUS_RATIO: f32 = 0.047;

// ============================================================================
// Render Assets
// ============================================================================

/// The user image, ready to draw.
#[derive(Debug, Clone)]
pub struct PlacedImage {
    /// The decoded source at its intrinsic size.
    pub source: Pixmap,
    pub placement: FittedPlacement,
    /// Absent when no shadow tint could be derived.
    pub silhouette: Option<Silhouette>,
}

/// Everything the compositor draws besides plain shapes.
///
/// Prepared before compositing so that no stage has to wait on anything.
#[derive(Debug, Clone, Default)]
pub struct RenderAssets {
    pub glyph: Option<GlyphStamp>,
    pub image: Option<PlacedImage>,
    /// The hard-shadow color. `None` skips both hard shadows.
    pub shadow_tint: Option<ParsedColor>,
}

// ============================================================================
// Render Context
// ============================================================================

/// State shared by the stages of a single composite pass.
pub struct RenderContext<'a> {
    /// The output raster.
    pub surface: Pixmap,

    /// Clip installed by the background stage, honored by every later stage.
    pub clip: Option<Mask>,

    pub config: &'a IconConfig,
    pub assets: &'a RenderAssets,

    warnings: Vec<RenderWarning>,
}

impl<'a> RenderContext<'a> {
    /// Creates a context over a transparent `icon_width × icon_width` surface.
    pub fn new(config: &'a IconConfig, assets: &'a RenderAssets) -> Result<Self> {
        let width = config.icon_width;
        let surface = Pixmap::new(width, width).ok_or(Error::SurfaceAllocation {
            width,
            height: width,
        })?;
        Ok(Self {
            surface,
            clip: None,
            config,
            assets,
            warnings: Vec::new(),
        })
    }

    /// Logs and records a non-fatal diagnostic.
    pub fn warn(&mut self, warning: RenderWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// The configured style, or `None` (with a diagnostic) if unsupported.
    pub fn style(&mut self, stage: &str) -> Option<StyleVariant> {
        let variant = self.config.style.variant_or_warn(stage);
        if variant.is_none() {
            let label = self.config.style.label().to_string();
            self.warnings.push(RenderWarning::UnsupportedStyle(label));
        }
        variant
    }

    /// True when the style is supported and not the flat one.
    pub fn is_rounded(&mut self, stage: &str) -> bool {
        self.style(stage).is_some_and(|v| !v.is_flat())
    }

    /// Parses a configured fill color, falling back to opaque black.
    pub fn fill_color(&mut self, field: &'static str, value: &str) -> ParsedColor {
        match ParsedColor::parse(value) {
            Ok(color) => color,
            Err(_) => {
                self.warn(RenderWarning::InvalidColor {
                    field,
                    value: value.to_string(),
                });
                ParsedColor::black()
            }
        }
    }

    pub fn warnings(&self) -> &[RenderWarning] {
        &self.warnings
    }

    pub fn finish(self) -> (RasterSurface, Vec<RenderWarning>) {
        (RasterSurface::new(self.surface), self.warnings)
    }
}

// ============================================================================
// Layer Stage
// ============================================================================

/// One step of the composite pass.
pub trait LayerStage {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Draws this stage onto `ctx.surface`, through `ctx.clip`.
    fn draw(&self, ctx: &mut RenderContext<'_>);
}

fn run<S: LayerStage>(ctx: &mut RenderContext<'_>, stage: &S) {
    log::debug!("drawing {}", S::NAME);
    stage.draw(ctx);
}

// ============================================================================
// Layer Compositor
// ============================================================================

/// Runs every stage, in order, over a fresh surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerCompositor;

impl LayerCompositor {
    /// Composites one icon.
    ///
    /// Fails only if the surface cannot be allocated; every other problem is
    /// returned as a warning alongside the surface.
    pub fn composite(
        &self,
        config: &IconConfig,
        assets: &RenderAssets,
    ) -> Result<(RasterSurface, Vec<RenderWarning>)> {
        let mut ctx = RenderContext::new(config, assets)?;

        run(&mut ctx, &Background);
        run(&mut ctx, &GlyphHardShadow);
        run(&mut ctx, &ImageHardShadow);
        run(&mut ctx, &MainImage);
        run(&mut ctx, &TextWithShadow);
        run(&mut ctx, &InlineShadow);
        run(&mut ctx, &GradientOverlay);

        Ok(ctx.finish())
    }
}

// ============================================================================
// Tests
// ============================================================================
