//! Shading, blending and conversion of CSS color strings.
//!
//! Colors are accepted as 3/4/6/8-digit hex (`#rgb`, `#rgba`, `#rrggbb`,
//! `#rrggbbaa`) or as `rgb(...)`/`rgba(...)`. The output keeps the input's
//! family unless the blend target asks for another one.

use palette::Srgb;
use resvg::tiny_skia::Color;

use crate::error::ColorError;

/// Shade applied to the icon background to derive the hard-shadow tint.
pub const SHADOW_SHADE: f64 = -0.4;

// ============================================================================
// Parsed colors
// ============================================================================

/// The textual family a color was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    Hex,
    Rgb,
}

impl ColorFormat {
    fn flipped(self) -> Self {
        match self {
            Self::Hex => Self::Rgb,
            Self::Rgb => Self::Hex,
        }
    }
}

/// A color normalized to 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedColor {
    pub rgb: Srgb<u8>,

    /// Explicit alpha in `[0, 1]`, or `None` when the input carried no alpha
    /// (implicitly opaque).
    pub alpha: Option<f64>,

    pub format: ColorFormat,
}

impl ParsedColor {
    /// Parses a hex or `rgb[a](...)` color string.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        let parsed = if let Some(digits) = trimmed.strip_prefix('#') {
            parse_hex(digits)
        } else if trimmed.starts_with("rgb") {
            parse_rgb(trimmed)
        } else {
            None
        };
        parsed.ok_or_else(|| ColorError::InvalidColor(input.to_string()))
    }

    /// Opaque black or white without explicit alpha.
    fn extreme(black: bool) -> Self {
        let v = if black { 0 } else { 255 };
        Self {
            rgb: Srgb::new(v, v, v),
            alpha: None,
            format: ColorFormat::Hex,
        }
    }

    /// Opaque black, the fallback fill.
    pub fn black() -> Self {
        Self::extreme(true)
    }

    /// Alpha as an 8-bit value, treating implicit alpha as opaque.
    pub fn alpha_u8(&self) -> u8 {
        self.alpha
            .map_or(255, |a| (a * 255.0).round().clamp(0.0, 255.0) as u8)
    }

    /// Converts to a tiny-skia paint color.
    pub fn to_skia(&self) -> Color {
        Color::from_rgba8(self.rgb.red, self.rgb.green, self.rgb.blue, self.alpha_u8())
    }

    /// Formats the color in its own family.
    pub fn to_css(&self) -> String {
        let Srgb { red, green, blue, .. } = self.rgb;
        match (self.format, self.alpha) {
            (ColorFormat::Hex, None) => format!("#{red:02x}{green:02x}{blue:02x}"),
            (ColorFormat::Hex, Some(_)) => {
                format!("#{red:02x}{green:02x}{blue:02x}{:02x}", self.alpha_u8())
            }
            (ColorFormat::Rgb, None) => format!("rgb({red},{green},{blue})"),
            (ColorFormat::Rgb, Some(a)) => format!("rgba({red},{green},{blue},{})", round3(a)),
        }
    }
}

fn parse_hex(digits: &str) -> Option<ParsedColor> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => digits.to_string(),
        _ => return None,
    };
    let value = u32::from_str_radix(&expanded, 16).ok()?;

    let (rgb, alpha) = if expanded.len() == 8 {
        let rgb = Srgb::new((value >> 24) as u8, (value >> 16) as u8, (value >> 8) as u8);
        (rgb, Some(round3(f64::from(value & 0xff) / 255.0)))
    } else {
        (Srgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8), None)
    };

    Some(ParsedColor {
        rgb,
        alpha,
        format: ColorFormat::Hex,
    })
}

fn parse_rgb(input: &str) -> Option<ParsedColor> {
    let body = input
        .strip_prefix("rgba(")
        .or_else(|| input.strip_prefix("rgb("))?
        .trim_end()
        .strip_suffix(')')?;
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if !(3..=4).contains(&parts.len()) {
        return None;
    }

    let channel = |part: &str| part.parse::<u8>().ok();
    let rgb = Srgb::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
    let alpha = match parts.get(3) {
        Some(part) => {
            let a: f64 = part.parse().ok()?;
            if !(0.0..=1.0).contains(&a) {
                return None;
            }
            Some(a)
        }
        None => None,
    };

    Some(ParsedColor {
        rgb,
        alpha,
        format: ColorFormat::Rgb,
    })
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

// ============================================================================
// Blending
// ============================================================================

/// Channel interpolation used by [`blend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Straight per-channel interpolation.
    Linear,
    /// Interpolates squared channel values and takes the square root, which
    /// shades more evenly to the eye.
    #[default]
    Quadratic,
}

/// What [`blend`] moves the source color toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendTarget<'a> {
    /// Black for negative percentages, white for positive ones.
    Shade,
    /// Same endpoints as `Shade`, but the result switches family
    /// (hex becomes `rgb()`, `rgb()` becomes hex).
    Contrast,
    /// Another color. The result uses this color's family.
    Color(&'a str),
}

/// Shades or blends `from` by `percent` (in `[-1, 1]`).
///
/// Negative percentages move toward black (or the target color), positive
/// ones toward white (or the target color). When either side carries an
/// explicit alpha the result carries a weighted alpha too; otherwise the
/// result has no alpha component.
pub fn blend(
    percent: f64,
    from: &str,
    target: BlendTarget<'_>,
    mode: BlendMode,
) -> Result<String, ColorError> {
    if !(-1.0..=1.0).contains(&percent) {
        return Err(ColorError::PercentOutOfRange(percent));
    }

    let source = ParsedColor::parse(from)?;
    let toward_black = percent < 0.0;
    let (dest, format) = match target {
        BlendTarget::Shade => (ParsedColor::extreme(toward_black), source.format),
        BlendTarget::Contrast => (ParsedColor::extreme(toward_black), source.format.flipped()),
        BlendTarget::Color(color) => {
            let dest = ParsedColor::parse(color)?;
            (dest, dest.format)
        }
    };

    let weight = percent.abs();
    let keep = 1.0 - weight;
    let mix = |a: u8, b: u8| -> u8 {
        let (a, b) = (f64::from(a), f64::from(b));
        let v = match mode {
            BlendMode::Linear => keep * a + weight * b,
            BlendMode::Quadratic => (keep * a * a + weight * b * b).sqrt(),
        };
        v.round().clamp(0.0, 255.0) as u8
    };

    let rgb = Srgb::new(
        mix(source.rgb.red, dest.rgb.red),
        mix(source.rgb.green, dest.rgb.green),
        mix(source.rgb.blue, dest.rgb.blue),
    );
    let alpha = match (source.alpha, dest.alpha) {
        (None, None) => None,
        (Some(a), None) | (None, Some(a)) => Some(a),
        (Some(a), Some(b)) => Some(a * keep + b * weight),
    };

    Ok(ParsedColor { rgb, alpha, format }.to_css())
}

/// Shades a color toward black or white with the default quadratic mode.
pub fn shade(percent: f64, color: &str) -> Result<String, ColorError> {
    blend(percent, color, BlendTarget::Shade, BlendMode::Quadratic)
}

/// The hard-shadow tint for a background: the background darkened by 40%.
pub fn shadow_tint(background: &str) -> Result<ParsedColor, ColorError> {
    ParsedColor::parse(&shade(SHADOW_SHADE, background)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_tint_darkens_background() {
        assert_eq!(shade(-0.4, "#9b4dca").unwrap(), "#783c9c");

        let tint = shadow_tint("#9b4dca").unwrap();
        assert_eq!(tint.rgb, Srgb::new(0x78, 0x3c, 0x9c));
        assert_eq!(tint.alpha, None);
    }

    #[test]
    fn zero_percent_is_identity() {
        for mode in [BlendMode::Linear, BlendMode::Quadratic] {
            assert_eq!(blend(0.0, "#9b4dca", BlendTarget::Shade, mode).unwrap(), "#9b4dca");
            assert_eq!(
                blend(0.0, "rgb(10,20,30)", BlendTarget::Shade, mode).unwrap(),
                "rgb(10,20,30)"
            );
        }
    }

    #[test]
    fn full_shade_reaches_black_and_white() {
        assert_eq!(shade(-1.0, "#9b4dca").unwrap(), "#000000");
        assert_eq!(shade(1.0, "#9b4dca").unwrap(), "#ffffff");
        assert_eq!(
            blend(-1.0, "rgb(1,2,3)", BlendTarget::Shade, BlendMode::Linear).unwrap(),
            "rgb(0,0,0)"
        );
    }

    #[test]
    fn full_shade_preserves_alpha() {
        // 0x80 / 255 = 0.502
        assert_eq!(shade(-1.0, "#9b4dca80").unwrap(), "#00000080");
        assert_eq!(shade(1.0, "rgba(10,20,30,0.25)").unwrap(), "rgba(255,255,255,0.25)");
    }

    #[test]
    fn linear_mode_interpolates_channels() {
        assert_eq!(
            blend(0.5, "rgb(0,0,0)", BlendTarget::Shade, BlendMode::Linear).unwrap(),
            "rgb(128,128,128)"
        );
        assert_eq!(
            blend(-0.5, "rgba(200,100,50,0.5)", BlendTarget::Shade, BlendMode::Linear).unwrap(),
            "rgba(100,50,25,0.5)"
        );
    }

    #[test]
    fn quadratic_mode_is_brighter_than_linear_when_darkening() {
        let linear = blend(-0.5, "#808080", BlendTarget::Shade, BlendMode::Linear).unwrap();
        let quadratic = blend(-0.5, "#808080", BlendTarget::Shade, BlendMode::Quadratic).unwrap();
        assert_eq!(linear, "#404040");
        // sqrt(0.5 * 128^2) = 90.5
        assert_eq!(quadratic, "#5b5b5b");
    }

    #[test]
    fn shorthand_hex_expands() {
        assert_eq!(shade(0.0, "#fff").unwrap(), "#ffffff");
        // 0x88 / 255 = 0.533, which maps back to 0x88
        assert_eq!(shade(0.0, "#f008").unwrap(), "#ff000088");
    }

    #[test]
    fn target_color_decides_output_family() {
        assert_eq!(
            blend(0.5, "#000000", BlendTarget::Color("#ffffff"), BlendMode::Linear).unwrap(),
            "#808080"
        );
        assert_eq!(
            blend(0.5, "#000000", BlendTarget::Color("rgb(255,255,255)"), BlendMode::Linear)
                .unwrap(),
            "rgb(128,128,128)"
        );
        assert_eq!(
            blend(0.5, "rgb(0,0,0)", BlendTarget::Color("#ffffff"), BlendMode::Linear).unwrap(),
            "#808080"
        );
    }

    #[test]
    fn contrast_target_switches_family() {
        let contrast = |color: &str| blend(0.0, color, BlendTarget::Contrast, BlendMode::Quadratic);
        assert_eq!(contrast("#ff0000").unwrap(), "rgb(255,0,0)");
        assert_eq!(contrast("rgb(255,0,0)").unwrap(), "#ff0000");
    }

    #[test]
    fn alpha_blends_when_both_sides_have_it() {
        let out = blend(
            0.5,
            "rgba(0,0,0,0.2)",
            BlendTarget::Color("rgba(0,0,0,0.6)"),
            BlendMode::Linear,
        )
        .unwrap();
        assert_eq!(out, "rgba(0,0,0,0.4)");
    }

    #[test]
    fn malformed_input_is_rejected() {
        let malformed = [
            "notacolor",
            "#12",
            "#12345",
            "#gggggg",
            "rgb(1,2)",
            "rgb(300,0,0)",
            "rgba(1,2,3,4)",
            "",
        ];
        for bad in malformed {
            assert_eq!(
                shade(-0.4, bad),
                Err(ColorError::InvalidColor(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
        assert!(blend(0.1, "#fff", BlendTarget::Color("nope"), BlendMode::Linear).is_err());
    }

    #[test]
    fn percent_out_of_range_is_rejected() {
        assert_eq!(shade(1.5, "#fff"), Err(ColorError::PercentOutOfRange(1.5)));
        assert!(shade(f64::NAN, "#fff").is_err());
    }

    #[test]
    fn output_keeps_family_across_percentages() {
        let inputs = ["#9b4dca", "#abc", "#11223344", "rgb(12,200,99)", "rgba(255,0,128,0.3)"];
        for input in inputs {
            let family = ParsedColor::parse(input).unwrap().format;
            for step in -10..=10 {
                let percent = f64::from(step) / 10.0;
                for mode in [BlendMode::Linear, BlendMode::Quadratic] {
                    let out = blend(percent, input, BlendTarget::Shade, mode).unwrap();
                    let format = ParsedColor::parse(&out).unwrap().format;
                    assert_eq!(format, family, "{input} @ {percent}");
                }
            }
        }
    }

    #[test]
    fn to_skia_uses_implicit_opaque_alpha() {
        let color = ParsedColor::parse("#ff0000").unwrap().to_skia();
        assert_eq!(color.alpha(), 1.0);
        assert_eq!(color.red(), 1.0);

        let translucent = ParsedColor::parse("rgba(0,0,0,0.4)").unwrap();
        assert_eq!(translucent.alpha_u8(), 102);
    }
}
