//! User-supplied images: decoding and placement.

use std::future::Future;

use image::RgbaImage;

use crate::error::ImageInputError;

/// Raw image bytes plus the content type the host declared for them, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl ImageInput {
    /// Input whose type is determined by sniffing the bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A decoded image in straight-alpha RGBA.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub pixels: RgbaImage,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// The platform image decoder.
pub trait ImageDecoder {
    /// Decodes `input`, failing with [`ImageInputError::NotAnImage`] when the
    /// content type is not an image type.
    fn decode(
        &self,
        input: &ImageInput,
    ) -> impl Future<Output = Result<DecodedImage, ImageInputError>>;
}

/// Decodes with the `image` crate, sniffing the format from magic bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl RasterDecoder {
    /// Decodes synchronously.
    pub fn decode_now(&self, input: &ImageInput) -> Result<DecodedImage, ImageInputError> {
        if let Some(declared) = &input.content_type {
            if !declared.trim().to_ascii_lowercase().starts_with("image/") {
                return Err(ImageInputError::NotAnImage {
                    content_type: declared.clone(),
                });
            }
        }

        let format = image::guess_format(&input.bytes).map_err(|_| ImageInputError::NotAnImage {
            content_type: sniff_label(&input.bytes).to_string(),
        })?;

        let decoded = image::load_from_memory_with_format(&input.bytes, format)
            .map_err(|err| ImageInputError::Decode(err.to_string()))?;
        let pixels = decoded.to_rgba8();
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ImageInputError::Decode("image has no pixels".into()));
        }
        Ok(DecodedImage { pixels })
    }
}

impl ImageDecoder for RasterDecoder {
    fn decode(
        &self,
        input: &ImageInput,
    ) -> impl Future<Output = Result<DecodedImage, ImageInputError>> {
        std::future::ready(self.decode_now(input))
    }
}

/// Best-effort content type for bytes no image format recognized.
fn sniff_label(bytes: &[u8]) -> &'static str {
    if bytes.is_empty() {
        "application/x-empty"
    } else if std::str::from_utf8(bytes).is_ok() {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}

// ============================================================================
// FittedPlacement
// ============================================================================

/// Where a source image lands on the icon.
///
/// The image keeps its aspect ratio, is centered, and its longer side spans
/// `icon_width × image_scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedPlacement {
    /// Short side over long side of the source.
    pub ratio: f32,
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
}

impl FittedPlacement {
    pub fn compute(
        source_width: u32,
        source_height: u32,
        icon_width: u32,
        image_scale: f32,
    ) -> Self {
        let canvas = icon_width as f32;
        let (sw, sh) = (source_width as f32, source_height as f32);

        let (ratio, width, height) = if source_width >= source_height {
            let ratio = sh / sw;
            (ratio, canvas * image_scale, canvas * ratio * image_scale)
        } else {
            let ratio = sw / sh;
            (ratio, canvas * ratio * image_scale, canvas * image_scale)
        };

        Self {
            ratio,
            width,
            height,
            x: canvas / 2.0 - width / 2.0,
            y: canvas / 2.0 - height / 2.0,
        }
    }

    /// Pixel size of an off-screen raster holding the placed image.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width.ceil() as u32).max(1),
            (self.height.ceil() as u32).max(1),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([1, 2, 3, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn wide_image_fills_width() {
        let p = FittedPlacement::compute(200, 100, 300, 1.0);
        assert_eq!(p.ratio, 0.5);
        assert_eq!((p.width, p.height), (300.0, 150.0));
        assert_eq!((p.x, p.y), (0.0, 75.0));
    }

    #[test]
    fn tall_image_fills_height_scaled() {
        let p = FittedPlacement::compute(100, 400, 300, 0.5);
        assert_eq!(p.ratio, 0.25);
        assert_eq!((p.width, p.height), (37.5, 150.0));
        assert_eq!((p.x, p.y), (131.25, 75.0));
        assert_eq!(p.pixel_size(), (38, 150));
    }

    #[test]
    fn square_image_is_centered() {
        let p = FittedPlacement::compute(64, 64, 300, 0.6);
        assert_eq!(p.ratio, 1.0);
        assert!((p.width - 180.0).abs() < 1e-4);
        assert!((p.x - 60.0).abs() < 1e-4);
        assert_eq!(p.x, p.y);
    }

    #[test]
    fn decodes_sniffed_png() {
        let decoded = RasterDecoder.decode_now(&ImageInput::new(png_bytes(5, 3))).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 3));
        assert_eq!(decoded.pixels.get_pixel(0, 0).0, [1, 2, 3, 255]);
    }

    #[test]
    fn plain_text_is_not_an_image() {
        let err = RasterDecoder
            .decode_now(&ImageInput::new(b"hello world".to_vec()))
            .unwrap_err();
        assert_eq!(
            err,
            ImageInputError::NotAnImage {
                content_type: "text/plain".into()
            }
        );
    }

    #[test]
    fn declared_type_is_checked_first() {
        let input = ImageInput::new(png_bytes(2, 2)).with_content_type("text/plain");
        assert!(matches!(
            RasterDecoder.decode_now(&input),
            Err(ImageInputError::NotAnImage { content_type }) if content_type == "text/plain"
        ));

        let declared = ImageInput::new(png_bytes(2, 2)).with_content_type("image/png");
        assert!(RasterDecoder.decode_now(&declared).is_ok());
    }

    #[test]
    fn truncated_png_fails_to_decode() {
        let mut bytes = png_bytes(4, 4);
        bytes.truncate(40);
        assert!(matches!(
            RasterDecoder.decode_now(&ImageInput::new(bytes)),
            Err(ImageInputError::Decode(_))
        ));
    }

    #[test]
    fn async_decode_matches_sync() {
        let input = ImageInput::new(png_bytes(3, 3));
        let decoded = pollster::block_on(RasterDecoder.decode(&input)).unwrap();
        assert_eq!(decoded, RasterDecoder.decode_now(&input).unwrap());
    }
}
