//! Hard shadows: stacked copies along a 45° diagonal.
//!
//! No blur is involved. The trail is made of `count` opaque stamps, each one
//! shifted left and down by half a step more than the previous one.

use resvg::tiny_skia::{Mask, Pixmap, PixmapPaint, PixmapRef, Transform};

use super::{LayerStage, RenderContext};

/// Distance in pixels between consecutive stamps, measured along each axis
/// as twice the per-axis shift.
pub const SHADOW_STEP: f32 = 2.0;

/// Number of glyph stamps for an icon: two thirds of its width, rounded up.
pub fn glyph_shadow_steps(icon_width: u32) -> u32 {
    let steps = (2 * u64::from(icon_width)).div_ceil(3);
    u32::try_from(steps).unwrap_or(u32::MAX)
}

/// Number of silhouette stamps: half the silhouette width, rounded up.
pub fn image_shadow_steps(silhouette_width: u32) -> u32 {
    silhouette_width.div_ceil(2)
}

/// Draws `stamp` `count` times, the `i`-th copy translated by
/// `(-i·step/2, +i·step/2)` from `origin`.
pub fn cast_hard_shadow(
    surface: &mut Pixmap,
    stamp: PixmapRef<'_>,
    origin: (f32, f32),
    count: u32,
    step: f32,
    clip: Option<&Mask>,
) {
    let paint = PixmapPaint::default();
    for i in 0..count {
        let shift = i as f32 * step / 2.0;
        let transform = Transform::from_translate(origin.0 - shift, origin.1 + shift);
        surface.draw_pixmap(0, 0, stamp, &paint, transform, clip);
    }
}

// ============================================================================
// Stages
// ============================================================================

/// The glyph's hard shadow, in the shadow tint.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphHardShadow;

impl LayerStage for GlyphHardShadow {
    const NAME: &'static str = "glyph hard shadow";

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let (Some(stamp), Some(tint)) = (&ctx.assets.glyph, ctx.assets.shadow_tint) else {
            return;
        };
        let tinted = stamp.tinted(&tint);
        let count = glyph_shadow_steps(ctx.config.icon_width);
        log::debug!("{}: {count} stamps", Self::NAME);

        cast_hard_shadow(
            &mut ctx.surface,
            tinted.as_ref(),
            (0.0, 0.0),
            count,
            SHADOW_STEP,
            ctx.clip.as_ref(),
        );
    }
}

/// The user image's hard shadow, made of its silhouette.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageHardShadow;

impl LayerStage for ImageHardShadow {
    const NAME: &'static str = "image hard shadow";

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let Some(image) = &ctx.assets.image else {
            return;
        };
        let Some(silhouette) = &image.silhouette else {
            return;
        };
        let count = image_shadow_steps(silhouette.width());
        log::debug!("{}: {count} stamps", Self::NAME);

        cast_hard_shadow(
            &mut ctx.surface,
            silhouette.pixmap().as_ref(),
            (image.placement.x, image.placement.y),
            count,
            SHADOW_STEP,
            ctx.clip.as_ref(),
        );
    }
}
