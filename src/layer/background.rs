//! Background shape and clip.

use resvg::tiny_skia::{FillRule, Mask, Paint, Rect, Transform};

use super::path::rounded_square;
use super::{LayerStage, RenderContext, CORNER_RADIUS_RATIO};

/// Fills the icon shape with the background color.
///
/// The flat style is a full square. Rounded styles fill a rounded square and
/// install it as the clip for every later stage. An unsupported style draws
/// nothing and installs an empty clip, so no later stage draws either.
#[derive(Debug, Clone, Copy, Default)]
pub struct Background;

impl LayerStage for Background {
    const NAME: &'static str = "background";

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let config = ctx.config;
        let width = config.width_f32();

        let Some(style) = ctx.style(Self::NAME) else {
            ctx.clip = Mask::new(config.icon_width, config.icon_width);
            return;
        };

        let color = ctx.fill_color("iconBackground", &config.icon_background);
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;

        if style.is_flat() {
            if let Some(rect) = Rect::from_xywh(0.0, 0.0, width, width) {
                ctx.surface.fill_rect(rect, &paint, Transform::identity(), None);
            }
            return;
        }

        let Some(shape) = rounded_square(width, width * CORNER_RADIUS_RATIO) else {
            return;
        };
        ctx.surface
            .fill_path(&shape, &paint, FillRule::Winding, Transform::identity(), None);

        let Some(mut clip) = Mask::new(config.icon_width, config.icon_width) else {
            return;
        };
        clip.fill_path(&shape, FillRule::Winding, true, Transform::identity());
        ctx.clip = Some(clip);
    }
}
