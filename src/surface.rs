//! The output raster and pixel-format conversions.
//!
//! Drawing happens on tiny-skia pixmaps, which store premultiplied RGBA.
//! Decoded images and silhouettes are kept as straight-alpha
//! [`RgbaImage`]s so per-pixel edits can work on plain color values.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{IntSize, Pixmap};

use crate::error::{Error, Result};

// ============================================================================
// RasterSurface
// ============================================================================

/// A finished square icon.
///
/// Every render produces a new surface; the pipeline keeps no reference to
/// it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    pixmap: Pixmap,
}

impl RasterSurface {
    pub(crate) fn new(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    /// Allocates a transparent `width × width` surface.
    pub fn blank(width: u32) -> Result<Self> {
        Pixmap::new(width, width)
            .map(Self::new)
            .ok_or(Error::SurfaceAllocation {
                width,
                height: width,
            })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The drawable handle for on-screen attachment.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Straight-alpha RGBA at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let p = self.pixmap.pixel(x, y)?;
        Some(unpremultiply([p.red(), p.green(), p.blue(), p.alpha()]))
    }

    /// Copies the surface into a straight-alpha image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        pixmap_to_rgba_image(&self.pixmap)
    }

    /// Encodes the surface as PNG.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.to_rgba_image()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Premultiplies one channel by alpha.
pub(crate) fn premultiply(channel: u8, alpha: u8) -> u8 {
    ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
}

/// Unpremultiplies a premultiplied RGBA pixel.
pub(crate) fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let restore = |c: u8| -> u8 {
        ((u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8
    };
    [restore(r), restore(g), restore(b), a]
}

/// Converts a tiny-skia pixmap to a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        *dst = Rgba(unpremultiply([src.red(), src.green(), src.blue(), src.alpha()]));
    }
    img
}

/// Converts a straight-alpha image to a tiny-skia pixmap.
///
/// Returns `None` for zero-sized images.
pub fn rgba_image_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let mut data = img.as_raw().clone();
    for pixel in data.chunks_exact_mut(4) {
        let a = pixel[3];
        pixel[0] = premultiply(pixel[0], a);
        pixel[1] = premultiply(pixel[1], a);
        pixel[2] = premultiply(pixel[2], a);
    }
    let size = IntSize::from_wh(img.width(), img.height())?;
    Pixmap::from_vec(data, size)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_surface_is_transparent() {
        let surface = RasterSurface::blank(16).unwrap();
        assert_eq!(surface.width(), 16);
        assert_eq!(surface.height(), 16);
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(16, 0), None);
    }

    #[test]
    fn pixel_past_right_edge_does_not_wrap() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        pixmap.fill(resvg::tiny_skia::Color::WHITE);
        let surface = RasterSurface::new(pixmap);

        assert_eq!(surface.pixel(3, 0), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(4, 0), None);
        assert_eq!(surface.pixel(7, 2), None);
        assert_eq!(surface.pixel(0, 4), None);
    }

    #[test]
    fn zero_sized_surface_fails() {
        assert!(matches!(
            RasterSurface::blank(0),
            Err(Error::SurfaceAllocation { width: 0, height: 0 })
        ));
    }

    #[test]
    fn opaque_pixels_survive_conversion() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([12, 200, 99, 255]));
        let pixmap = rgba_image_to_pixmap(&img).unwrap();
        assert_eq!(pixmap_to_rgba_image(&pixmap), img);
    }

    #[test]
    fn translucent_pixels_are_premultiplied() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 0, 128]));
        let pixmap = rgba_image_to_pixmap(&img).unwrap();
        let p = pixmap.pixel(0, 0).unwrap();
        assert_eq!((p.red(), p.green(), p.blue(), p.alpha()), (100, 50, 0, 128));
    }

    #[test]
    fn unpremultiply_clears_transparent_pixels() {
        assert_eq!(unpremultiply([10, 10, 10, 0]), [0, 0, 0, 0]);
        assert_eq!(unpremultiply([128, 64, 0, 128]), [255, 128, 0, 128]);
    }

    #[test]
    fn png_export_decodes_back() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(10, 20, 30, 255));
        let surface = RasterSurface::new(pixmap);

        let png = surface.to_png_bytes().unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(2, 2).0, [10, 20, 30, 255]);
    }
}
