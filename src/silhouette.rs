//! Image silhouettes for hard shadows.
//!
//! The source image is drawn off-screen at its fitted size, then every pixel
//! that is not fully transparent takes the shadow tint while keeping its
//! alpha. The result is stamped repeatedly by the image shadow caster.

use image::RgbaImage;
use resvg::tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::color::ParsedColor;
use crate::source_image::FittedPlacement;
use crate::surface::{pixmap_to_rgba_image, rgba_image_to_pixmap};

/// A single-tint copy of the placed image.
#[derive(Debug, Clone, PartialEq)]
pub struct Silhouette {
    image: RgbaImage,
    pixmap: Pixmap,
}

impl Silhouette {
    /// Builds the silhouette of `source` scaled to `placement`.
    ///
    /// Returns `None` if the placed image cannot be rasterized.
    pub fn build(source: &Pixmap, placement: &FittedPlacement, tint: &ParsedColor) -> Option<Self> {
        let placed = render_placed(source, placement)?;
        let image = recolor(&placed, tint);
        let pixmap = rgba_image_to_pixmap(&image)?;
        Some(Self { image, pixmap })
    }

    /// Straight-alpha pixels of the silhouette.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// The drawable raster used for stamping.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }
}

/// Draws `source` into an off-screen raster the size of `placement`.
pub fn render_placed(source: &Pixmap, placement: &FittedPlacement) -> Option<RgbaImage> {
    let (width, height) = placement.pixel_size();
    let mut target = Pixmap::new(width, height)?;

    let sx = placement.width / source.width() as f32;
    let sy = placement.height / source.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    target.draw_pixmap(0, 0, source.as_ref(), &paint, Transform::from_scale(sx, sy), None);

    Some(pixmap_to_rgba_image(&target))
}

/// Replaces the color of every non-transparent pixel with `tint`, keeping
/// each pixel's alpha. Transparent pixels stay untouched.
pub fn recolor(placed: &RgbaImage, tint: &ParsedColor) -> RgbaImage {
    let mut out = placed.clone();
    let rgb = [tint.rgb.red, tint.rgb.green, tint.rgb.blue];

    for pixel in out.pixels_mut() {
        if pixel[3] == 0 {
            continue;
        }
        pixel[0] = rgb[0];
        pixel[1] = rgb[1];
        pixel[2] = rgb[2];
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
