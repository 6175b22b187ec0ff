//! The render entry point.
//!
//! [`RenderPipeline`] owns the platform collaborators (glyph lookup, image
//! decoder, glyph rasterizer) and turns settings plus optional image bytes
//! into a finished [`RasterSurface`]. Everything asynchronous happens before
//! the composite pass: waiting for fonts, then decoding the image. The pass
//! itself is one synchronous burst.
//!
//! # Example
//!
//! ```
//! use badge_renderer::{GlyphTable, IconSettings, RenderPipeline};
//!
//! let mut pipeline = RenderPipeline::new(GlyphTable::new());
//! let settings = IconSettings::new().with_icon_width(64).with_icon_text("none");
//!
//! let output = pipeline.render_blocking(&settings, None).unwrap();
//! assert_eq!(output.surface.width(), 64);
//! ```

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::color::{shadow_tint, ParsedColor};
use crate::config::{IconConfig, IconSettings};
use crate::error::{ImageInputError, RenderWarning, Result};
use crate::glyph::{GlyphLookup, GlyphRasterizer, GlyphStamp, SvgTextRasterizer};
use crate::layer::{LayerCompositor, PlacedImage, RenderAssets};
use crate::silhouette::Silhouette;
use crate::source_image::{DecodedImage, FittedPlacement, ImageDecoder, ImageInput, RasterDecoder};
use crate::surface::{rgba_image_to_pixmap, RasterSurface};

/// A finished icon and the diagnostics raised while drawing it.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub surface: RasterSurface,
    pub warnings: Vec<RenderWarning>,
}

// ============================================================================
// DecodeKey
// ============================================================================

/// Identifies an image input by content.
///
/// Two inputs with equal keys decode to the same raster, so a cached decode
/// is never stale.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DecodeKey {
    hash: u64,
    len: usize,
    content_type: Option<String>,
}

impl DecodeKey {
    fn of(input: &ImageInput) -> Self {
        let mut hasher = DefaultHasher::new();
        input.bytes.hash(&mut hasher);
        Self {
            hash: hasher.finish(),
            len: input.bytes.len(),
            content_type: input.content_type.clone(),
        }
    }
}

type DecodeResult = std::result::Result<DecodedImage, ImageInputError>;

// ============================================================================
// RenderPipeline
// ============================================================================

/// Renders icons, one at a time.
///
/// `render` takes `&mut self`, so a pipeline never has two renders in flight.
/// The most recent decode is kept and reused when the same image bytes come
/// back.
pub struct RenderPipeline<G, D = RasterDecoder, R = SvgTextRasterizer> {
    glyphs: G,
    decoder: D,
    rasterizer: R,
    compositor: LayerCompositor,
    last_decode: Option<(DecodeKey, DecodeResult)>,
}

impl<G: GlyphLookup> RenderPipeline<G> {
    /// A pipeline using the stock decoder and the system fonts.
    pub fn new(glyphs: G) -> Self {
        Self::with_parts(glyphs, RasterDecoder, SvgTextRasterizer::with_system_fonts())
    }
}

impl<G, D, R> RenderPipeline<G, D, R>
where
    G: GlyphLookup,
    D: ImageDecoder,
    R: GlyphRasterizer,
{
    pub fn with_parts(glyphs: G, decoder: D, rasterizer: R) -> Self {
        Self {
            glyphs,
            decoder,
            rasterizer,
            compositor: LayerCompositor,
            last_decode: None,
        }
    }

    pub fn glyphs(&self) -> &G {
        &self.glyphs
    }

    /// Forgets the cached decode.
    pub fn clear_cache(&mut self) {
        self.last_decode = None;
    }

    /// Renders `settings`, with an optional user image.
    ///
    /// Waits for the glyph lookup to be ready before resolving the settings.
    /// Fails only on an invalid configuration or when the surface cannot be
    /// allocated.
    pub async fn render(
        &mut self,
        settings: &IconSettings,
        image: Option<&ImageInput>,
    ) -> Result<RenderOutput> {
        self.glyphs.ready().await;
        let (config, warnings) = settings.resolve_with_warnings(&self.glyphs)?;
        self.render_with(&config, image, warnings).await
    }

    /// Renders an already-resolved configuration.
    pub async fn render_config(
        &mut self,
        config: &IconConfig,
        image: Option<&ImageInput>,
    ) -> Result<RenderOutput> {
        self.glyphs.ready().await;
        self.render_with(config, image, Vec::new()).await
    }

    /// Blocks the current thread on [`render`](Self::render).
    pub fn render_blocking(
        &mut self,
        settings: &IconSettings,
        image: Option<&ImageInput>,
    ) -> Result<RenderOutput> {
        pollster::block_on(self.render(settings, image))
    }

    async fn render_with(
        &mut self,
        config: &IconConfig,
        image: Option<&ImageInput>,
        mut warnings: Vec<RenderWarning>,
    ) -> Result<RenderOutput> {
        let decoded = match image {
            Some(input) => Some(self.decode(input).await),
            None => None,
        };

        log::debug!(
            "rendering {0}x{0} icon, style {1}",
            config.icon_width,
            config.style.label()
        );
        let assets = self.prepare_assets(config, decoded, &mut warnings);
        let (surface, stage_warnings) = self.compositor.composite(config, &assets)?;
        warnings.extend(stage_warnings);

        Ok(RenderOutput { surface, warnings })
    }

    async fn decode(&mut self, input: &ImageInput) -> DecodeResult {
        let key = DecodeKey::of(input);
        if let Some((cached, result)) = &self.last_decode {
            if *cached == key {
                log::debug!("reusing decoded image ({} bytes)", key.len);
                return result.clone();
            }
        }

        let result = self.decoder.decode(input).await;
        self.last_decode = Some((key, result.clone()));
        result
    }

    fn prepare_assets(
        &self,
        config: &IconConfig,
        decoded: Option<DecodeResult>,
        warnings: &mut Vec<RenderWarning>,
    ) -> RenderAssets {
        let shadow_tint = match shadow_tint(&config.icon_background) {
            Ok(tint) => Some(tint),
            Err(err) => {
                log::debug!("shadow tint: {err}");
                push_warning(warnings, RenderWarning::ShadowTintUnavailable);
                None
            }
        };

        let glyph = config.glyph.as_ref().and_then(|glyph| {
            let coverage = self
                .rasterizer
                .rasterize(glyph, config.font_size, config.icon_width);
            if coverage.is_none() {
                push_warning(warnings, RenderWarning::GlyphRasterization);
            }
            coverage.map(GlyphStamp::new)
        });

        let image = match decoded {
            None => None,
            Some(Err(err)) => {
                push_warning(warnings, err.into());
                None
            }
            Some(Ok(decoded)) => place_image(&decoded, config, shadow_tint.as_ref()),
        };

        RenderAssets {
            glyph,
            image,
            shadow_tint,
        }
    }
}

fn place_image(
    decoded: &DecodedImage,
    config: &IconConfig,
    tint: Option<&ParsedColor>,
) -> Option<PlacedImage> {
    let source = rgba_image_to_pixmap(&decoded.pixels)?;
    let placement = FittedPlacement::compute(
        decoded.width(),
        decoded.height(),
        config.icon_width,
        config.image_scale,
    );
    let silhouette = tint.and_then(|tint| Silhouette::build(&source, &placement, tint));
    Some(PlacedImage {
        source,
        placement,
        silhouette,
    })
}

fn push_warning(warnings: &mut Vec<RenderWarning>, warning: RenderWarning) {
    log::warn!("{warning}");
    warnings.push(warning);
}

// ============================================================================
// Tests
// ============================================================================
