//! The crisp foreground: the user image and the glyph.

use palette::Srgb;
use resvg::tiny_skia::{FilterQuality, PixmapPaint, Transform};

use super::{LayerStage, RenderContext};
use crate::color::{ColorFormat, ParsedColor};

/// Vertical offset of the soft text shadow, relative to the icon width.
pub const SOFT_SHADOW_OFFSET_RATIO: f32 = 0.02;

/// Opacity of the soft text shadow.
pub const SOFT_SHADOW_ALPHA: f64 = 0.4;

/// The decoded source image at its fitted placement, at full opacity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainImage;

impl LayerStage for MainImage {
    const NAME: &'static str = "main image";

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let Some(image) = &ctx.assets.image else {
            return;
        };
        let placement = image.placement;
        let sx = placement.width / image.source.width() as f32;
        let sy = placement.height / image.source.height() as f32;

        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let transform = Transform::from_row(sx, 0.0, 0.0, sy, placement.x, placement.y);
        ctx.surface
            .draw_pixmap(0, 0, image.source.as_ref(), &paint, transform, ctx.clip.as_ref());
    }
}

/// The glyph at the icon center in the font color.
///
/// Rounded styles first draw a single 40% black copy slightly below it. The
/// shadow is scaled by the font color's own alpha.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextWithShadow;

impl LayerStage for TextWithShadow {
    const NAME: &'static str = "text";

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let Some(stamp) = &ctx.assets.glyph else {
            return;
        };
        let config = ctx.config;
        let paint = PixmapPaint::default();
        let color = ctx.fill_color("fontColor", &config.font_color);

        if ctx.is_rounded(Self::NAME) {
            let shadow = stamp.tinted(&soft_shadow_color(&color));
            let offset = config.width_f32() * SOFT_SHADOW_OFFSET_RATIO;
            ctx.surface.draw_pixmap(
                0,
                0,
                shadow.as_ref(),
                &paint,
                Transform::from_translate(0.0, offset),
                ctx.clip.as_ref(),
            );
        }

        let text = stamp.tinted(&color);
        ctx.surface.draw_pixmap(
            0,
            0,
            text.as_ref(),
            &paint,
            Transform::identity(),
            ctx.clip.as_ref(),
        );
    }
}

fn soft_shadow_color(font_color: &ParsedColor) -> ParsedColor {
    ParsedColor {
        rgb: Srgb::new(0, 0, 0),
        alpha: Some(SOFT_SHADOW_ALPHA * font_color.alpha.unwrap_or(1.0)),
        format: ColorFormat::Rgb,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::tests::{block_stamp, config};
    use crate::layer::{PlacedImage, RenderAssets};
    use crate::source_image::FittedPlacement;
    use crate::surface::rgba_image_to_pixmap;
    use image::{Rgba, RgbaImage};

    fn rgba(ctx: &RenderContext<'_>, x: u32, y: u32) -> [u8; 4] {
        let p = ctx.surface.pixel(x, y).unwrap().demultiply();
        [p.red(), p.green(), p.blue(), p.alpha()]
    }

    fn glyph_assets(width: u32) -> RenderAssets {
        RenderAssets {
            glyph: Some(block_stamp(width)),
            ..RenderAssets::default()
        }
    }

    #[test]
    fn flat_text_has_no_soft_shadow() {
        let config = config(100, "11.0");
        let assets = glyph_assets(100);
        let mut ctx = RenderContext::new(&config, &assets).unwrap();
        TextWithShadow.draw(&mut ctx);

        // block spans 37.5..62.5
        assert_eq!(rgba(&ctx, 50, 50), [255, 255, 255, 255]);
        assert_eq!(rgba(&ctx, 50, 63)[3], 0);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn rounded_text_casts_soft_shadow_below() {
        let config = config(100, "13.0");
        let assets = glyph_assets(100);
        let mut ctx = RenderContext::new(&config, &assets).unwrap();
        TextWithShadow.draw(&mut ctx);

        assert_eq!(rgba(&ctx, 50, 50), [255, 255, 255, 255]);
        // 2px below the glyph: shadow only
        let below = rgba(&ctx, 50, 63);
        assert_eq!(&below[..3], &[0, 0, 0]);
        assert_eq!(below[3], 102);
        assert_eq!(rgba(&ctx, 50, 36)[3], 0);
    }

    #[test]
    fn unsupported_style_still_draws_text() {
        let config = config(100, "abc");
        let assets = glyph_assets(100);
        let mut ctx = RenderContext::new(&config, &assets).unwrap();
        TextWithShadow.draw(&mut ctx);

        assert_eq!(rgba(&ctx, 50, 50), [255, 255, 255, 255]);
        assert_eq!(rgba(&ctx, 50, 63)[3], 0);
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn translucent_font_color_lightens_soft_shadow() {
        let mut config = config(100, "13.0");
        config.font_color = "rgba(255,255,255,0.5)".into();
        let assets = glyph_assets(100);
        let mut ctx = RenderContext::new(&config, &assets).unwrap();
        TextWithShadow.draw(&mut ctx);

        // 0.4 * 0.5 of full coverage
        let below = rgba(&ctx, 50, 63);
        assert_eq!(&below[..3], &[0, 0, 0]);
        assert!(below[3].abs_diff(51) <= 1);
    }

    #[test]
    fn font_color_tints_glyph() {
        let mut config = config(100, "11.0");
        config.font_color = "rgb(10,200,30)".into();
        let assets = glyph_assets(100);
        let mut ctx = RenderContext::new(&config, &assets).unwrap();
        TextWithShadow.draw(&mut ctx);

        assert_eq!(rgba(&ctx, 50, 50), [10, 200, 30, 255]);
    }

    #[test]
    fn main_image_lands_on_placement() {
        let config = config(40, "11.0");
        let pixels = RgbaImage::from_pixel(8, 4, Rgba([200, 10, 10, 255]));
        let source = rgba_image_to_pixmap(&pixels).unwrap();
        let placement = FittedPlacement::compute(8, 4, 40, 1.0);
        let assets = RenderAssets {
            image: Some(PlacedImage {
                source,
                placement,
                silhouette: None,
            }),
            ..RenderAssets::default()
        };
        let mut ctx = RenderContext::new(&config, &assets).unwrap();
        MainImage.draw(&mut ctx);

        // 40x20 at (0, 10)
        assert_eq!(rgba(&ctx, 20, 20), [200, 10, 10, 255]);
        assert_eq!(rgba(&ctx, 20, 5)[3], 0);
        assert_eq!(rgba(&ctx, 20, 35)[3], 0);
    }
}
