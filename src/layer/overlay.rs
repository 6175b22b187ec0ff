//! Decorative overlays for the rounded styles.

use resvg::tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, Point, Rect, SpreadMode, Transform,
};

use super::path::{bevel_strip, Edge};
use super::{LayerStage, RenderContext, CORNER_RADIUS_RATIO};

/// Height of the bevel strips, relative to the icon width.
pub const INLINE_HEIGHT_RATIO: f32 = 0.015;
pub const INLINE_OPACITY: f32 = 0.4;
pub const GRADIENT_OPACITY: f32 = 0.2;

const BEVEL_DARK: [u8; 3] = [0x28, 0x2f, 0x33];
const BEVEL_LIGHT: [u8; 3] = [0xff, 0xff, 0xff];

// ============================================================================
// InlineShadow
// ============================================================================

/// A dark strip along the bottom inner edge and a light one along the top,
/// faking an embossed bevel.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineShadow;

impl LayerStage for InlineShadow {
    const NAME: &'static str = "inline shadow";

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        if !ctx.is_rounded(Self::NAME) {
            return;
        }
        let width = ctx.config.width_f32();
        let radius = width * CORNER_RADIUS_RATIO;
        let height = width * INLINE_HEIGHT_RATIO;

        for (edge, [r, g, b]) in [(Edge::Bottom, BEVEL_DARK), (Edge::Top, BEVEL_LIGHT)] {
            let Some(strip) = bevel_strip(width, radius, height, edge) else {
                continue;
            };
            let mut color = Color::from_rgba8(r, g, b, 255);
            color.apply_opacity(INLINE_OPACITY);

            let mut paint = Paint::default();
            paint.set_color(color);
            paint.anti_alias = true;
            ctx.surface.fill_path(
                &strip,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                ctx.clip.as_ref(),
            );
        }
    }
}

// ============================================================================
// GradientOverlay
// ============================================================================

/// A faint diagonal sheen: transparent at the bottom-left corner, white at
/// the top-right one.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradientOverlay;

impl LayerStage for GradientOverlay {
    const NAME: &'static str = "gradient";

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        if !ctx.is_rounded(Self::NAME) {
            return;
        }
        let width = ctx.config.width_f32();

        // stops interpolate unpremultiplied, so both ends stay white
        let clear = Color::from_rgba8(255, 255, 255, 0);
        let mut white = Color::WHITE;
        white.apply_opacity(GRADIENT_OPACITY);
        let Some(shader) = LinearGradient::new(
            Point::from_xy(0.0, width),
            Point::from_xy(width, 0.0),
            vec![GradientStop::new(0.0, clear), GradientStop::new(1.0, white)],
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };
        let Some(rect) = Rect::from_xywh(0.0, 0.0, width, width) else {
            return;
        };

        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        ctx.surface
            .fill_rect(rect, &paint, Transform::identity(), ctx.clip.as_ref());
    }
}
