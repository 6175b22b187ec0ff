//! Icon configuration.
//!
//! [`IconSettings`] is the loosely-filled, serializable form a host UI hands
//! over (every field optional, camelCase JSON). [`IconSettings::resolve`]
//! turns it into an [`IconConfig`], the immutable snapshot a single render
//! works from.
//!
//! # Example
//!
//! ```
//! use badge_renderer::{GlyphTable, IconSettings};
//!
//! let settings = IconSettings::from_json(r#"{ "iconWidth": 128, "iconText": "none" }"#).unwrap();
//! let config = settings.resolve(&GlyphTable::new()).unwrap();
//!
//! assert_eq!(config.font_size, 64.0);
//! assert!(config.glyph.is_none());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, RenderWarning, Result};
use crate::glyph::GlyphLookup;

/// Glyph text that means "draw no glyph".
pub const NO_GLYPH: &str = "none";

/// Glyph color when none is given.
pub const DEFAULT_FONT_COLOR: &str = "#ffffff";
/// Icon-font family the glyph is drawn with.
pub const DEFAULT_FONT_FAMILY: &str = "Font Awesome 5 Free";
/// Weight of the solid icon-font face.
pub const DEFAULT_FONT_WEIGHT: u16 = 900;
/// Background fill when none is given.
pub const DEFAULT_ICON_BACKGROUND: &str = "#9b4dca";
/// Icon class looked up when neither a class nor glyph text is given.
pub const DEFAULT_ICON_CLASS: &str = "fas fa-address-card";
/// Edge length of the output square, in pixels.
pub const DEFAULT_ICON_WIDTH: u32 = 300;
/// The user image spans the full icon by default.
pub const DEFAULT_IMAGE_SCALE: f32 = 1.0;

// ============================================================================
// StyleVariant
// ============================================================================

/// The closed set of visual styles, named after the release they imitate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StyleVariant {
    /// Flat square, no bevel, no gradient, no soft text shadow.
    #[cfg_attr(feature = "clap", value(name = "11.0"))]
    V11,
    /// Rounded square with bevel strips, sheen and soft text shadow.
    #[cfg_attr(feature = "clap", value(name = "12.0"))]
    V12,
    /// Same shape as 12.0; the default.
    #[default]
    #[cfg_attr(feature = "clap", value(name = "13.0"))]
    V13,
    /// Same shape as 12.0.
    #[cfg_attr(feature = "clap", value(name = "14.0"))]
    V14,
    /// Same shape as 12.0.
    #[cfg_attr(feature = "clap", value(name = "15.0"))]
    V15,
}

impl StyleVariant {
    /// Every variant, oldest first.
    pub const ALL: [Self; 5] = [Self::V11, Self::V12, Self::V13, Self::V14, Self::V15];

    /// Looks up a variant by its label, e.g. `"13.0"`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.label() == label.trim())
    }

    /// The label hosts use for this variant, e.g. `"13.0"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::V11 => "11.0",
            Self::V12 => "12.0",
            Self::V13 => "13.0",
            Self::V14 => "14.0",
            Self::V15 => "15.0",
        }
    }

    /// True for the oldest, flat style.
    pub fn is_flat(self) -> bool {
        self == Self::V11
    }
}

/// The style a render was asked for, including labels outside the known set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleChoice {
    Supported(StyleVariant),
    Unsupported(String),
}

impl StyleChoice {
    pub fn from_label(label: &str) -> Self {
        StyleVariant::from_label(label)
            .map(Self::Supported)
            .unwrap_or_else(|| Self::Unsupported(label.to_string()))
    }

    /// Returns the variant, logging the standard diagnostic when unsupported.
    ///
    /// Style-dependent stages call this so each one reports the problem.
    pub fn variant_or_warn(&self, stage: &str) -> Option<StyleVariant> {
        match self {
            Self::Supported(variant) => Some(*variant),
            Self::Unsupported(label) => {
                log::warn!("{stage}: unsupported version selected ({label:?})");
                None
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Supported(variant) => variant.label(),
            Self::Unsupported(label) => label,
        }
    }
}

// ============================================================================
// IconConfig
// ============================================================================

/// A glyph from the icon font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// The text to draw, usually a single private-use codepoint.
    pub text: String,
    pub font_family: String,
    pub font_weight: u16,
}

/// Immutable configuration for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct IconConfig {
    /// Glyph color, as given. Parsed when drawn.
    pub font_color: String,
    /// Background color, as given. Also the base of the hard-shadow tint.
    pub icon_background: String,
    /// `None` when no glyph should be drawn.
    pub glyph: Option<Glyph>,
    /// Glyph size in pixels.
    pub font_size: f32,
    /// Edge length of the square output, in pixels. Always > 0.
    pub icon_width: u32,
    /// Fraction of the icon the user image spans, in `(0, 1]`.
    pub image_scale: f32,
    /// The requested style, kept even when unsupported.
    pub style: StyleChoice,
}

impl IconConfig {
    pub fn width_f32(&self) -> f32 {
        self.icon_width as f32
    }
}

// ============================================================================
// IconSettings
// ============================================================================

/// Serializable, partially-filled icon settings.
///
/// ```json
/// {
///   "fontColor": "#ffffff",
///   "iconBackground": "#9b4dca",
///   "iconClass": "fas fa-address-card",
///   "iconWidth": 300,
///   "imageScale": 0.6,
///   "styleVariant": "13.0"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct IconSettings {
    /// Glyph color: hex (3, 4, 6 or 8 digits) or `rgb()`/`rgba()`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,

    /// Icon-font family. Defaults to [`DEFAULT_FONT_FAMILY`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    /// Derived as half the icon width when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    /// Taken from the glyph lookup when both this and `icon_text` are absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,

    /// Background color, in the same formats as `font_color`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_background: Option<String>,

    /// Icon-font class name used to look up the glyph, e.g. `"fas fa-carrot"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_class: Option<String>,

    /// Explicit glyph text. `"none"` disables the glyph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_text: Option<String>,

    /// Edge length of the output square, in pixels. Must not be 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_width: Option<u32>,

    /// Fraction of the icon the user image spans. Clamped into `(0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_scale: Option<f32>,

    /// Style label such as `"13.0"`. Unknown labels are kept and reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_variant: Option<String>,
}

impl IconSettings {
    /// Creates empty settings; every field resolves to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output edge length in pixels.
    pub fn with_icon_width(mut self, width: u32) -> Self {
        self.icon_width = Some(width);
        self
    }

    /// Sets explicit glyph text; [`NO_GLYPH`] disables the glyph.
    pub fn with_icon_text(mut self, text: impl Into<String>) -> Self {
        self.icon_text = Some(text.into());
        self
    }

    /// Sets the icon-font class to look the glyph up by.
    pub fn with_icon_class(mut self, class: impl Into<String>) -> Self {
        self.icon_class = Some(class.into());
        self
    }

    /// Sets the background color.
    pub fn with_icon_background(mut self, color: impl Into<String>) -> Self {
        self.icon_background = Some(color.into());
        self
    }

    /// Sets the glyph color.
    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = Some(color.into());
        self
    }

    /// Sets the fraction of the icon the user image spans.
    pub fn with_image_scale(mut self, scale: f32) -> Self {
        self.image_scale = Some(scale);
        self
    }

    /// Sets the style by label, e.g. `"11.0"`.
    pub fn with_style_variant(mut self, label: impl Into<String>) -> Self {
        self.style_variant = Some(label.into());
        self
    }

    /// Serializes the settings to a JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the settings to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes settings from a JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolves defaults into an [`IconConfig`].
    ///
    /// Provided values win; dependent values (font size, glyph text, font
    /// weight) are derived afterwards. Fails only when the icon width is 0.
    pub fn resolve<L: GlyphLookup + ?Sized>(&self, glyphs: &L) -> Result<IconConfig> {
        self.resolve_with_warnings(glyphs).map(|(config, _)| config)
    }

    /// Like [`resolve`](Self::resolve), also returning the diagnostics raised
    /// while deriving the glyph.
    pub fn resolve_with_warnings<L: GlyphLookup + ?Sized>(
        &self,
        glyphs: &L,
    ) -> Result<(IconConfig, Vec<RenderWarning>)> {
        let mut warnings = Vec::new();

        let icon_width = self.icon_width.unwrap_or(DEFAULT_ICON_WIDTH);
        if icon_width == 0 {
            return Err(Error::InvalidConfig("iconWidth must be greater than 0".into()));
        }

        let font_size = self
            .font_size
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(icon_width as f32 * 0.5);

        let image_scale = match self.image_scale {
            Some(s) if s.is_finite() => s.clamp(f32::EPSILON, 1.0),
            _ => DEFAULT_IMAGE_SCALE,
        };

        let font_family = self
            .font_family
            .clone()
            .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string());

        let (text, font_weight) = match &self.icon_text {
            Some(text) => (Some(text.clone()), self.font_weight.unwrap_or(DEFAULT_FONT_WEIGHT)),
            None => {
                let class = self.icon_class.as_deref().unwrap_or(DEFAULT_ICON_CLASS);
                match glyphs.lookup_glyph(class) {
                    Some(metrics) => (
                        Some(metrics.codepoint),
                        self.font_weight.unwrap_or(metrics.font_weight),
                    ),
                    None => {
                        let warning = RenderWarning::GlyphNotFound(class.to_string());
                        log::warn!("{warning}");
                        warnings.push(warning);
                        (None, self.font_weight.unwrap_or(DEFAULT_FONT_WEIGHT))
                    }
                }
            }
        };

        let glyph = text
            .filter(|t| !t.is_empty() && t != NO_GLYPH)
            .map(|text| Glyph {
                text,
                font_family,
                font_weight,
            });

        let style = StyleChoice::from_label(
            self.style_variant
                .as_deref()
                .unwrap_or(StyleVariant::default().label()),
        );

        let config = IconConfig {
            font_color: self
                .font_color
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT_COLOR.to_string()),
            icon_background: self
                .icon_background
                .clone()
                .unwrap_or_else(|| DEFAULT_ICON_BACKGROUND.to_string()),
            glyph,
            font_size,
            icon_width,
            image_scale,
            style,
        };
        Ok((config, warnings))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::{GlyphMetrics, GlyphTable};

    fn table() -> GlyphTable {
        let mut table = GlyphTable::new();
        table.insert("fas fa-address-card", GlyphMetrics::new("\u{f2bb}", 900));
        table.insert("far fa-smile", GlyphMetrics::new("\u{f118}", 400));
        table
    }

    #[test]
    fn defaults_resolve() {
        let config = IconSettings::new().resolve(&table()).unwrap();

        assert_eq!(config.icon_width, 300);
        assert_eq!(config.font_size, 150.0);
        assert_eq!(config.font_color, "#ffffff");
        assert_eq!(config.icon_background, "#9b4dca");
        assert_eq!(config.image_scale, 1.0);
        assert_eq!(config.style, StyleChoice::Supported(StyleVariant::V13));

        let glyph = config.glyph.unwrap();
        assert_eq!(glyph.text, "\u{f2bb}");
        assert_eq!(glyph.font_weight, 900);
        assert_eq!(glyph.font_family, "Font Awesome 5 Free");
    }

    #[test]
    fn font_size_follows_width() {
        let config = IconSettings::new()
            .with_icon_width(128)
            .resolve(&table())
            .unwrap();
        assert_eq!(config.font_size, 64.0);

        let explicit = IconSettings {
            font_size: Some(20.0),
            ..IconSettings::new().with_icon_width(128)
        };
        assert_eq!(explicit.resolve(&table()).unwrap().font_size, 20.0);
    }

    #[test]
    fn weight_comes_from_lookup_only_when_absent() {
        let looked_up = IconSettings::new()
            .with_icon_class("far fa-smile")
            .resolve(&table())
            .unwrap();
        assert_eq!(looked_up.glyph.unwrap().font_weight, 400);

        let explicit = IconSettings {
            font_weight: Some(700),
            ..IconSettings::new().with_icon_class("far fa-smile")
        };
        assert_eq!(explicit.resolve(&table()).unwrap().glyph.unwrap().font_weight, 700);
    }

    #[test]
    fn explicit_text_skips_lookup() {
        let config = IconSettings::new()
            .with_icon_text("A")
            .with_icon_class("unknown")
            .resolve_with_warnings(&table())
            .unwrap();
        assert_eq!(config.0.glyph.unwrap().text, "A");
        assert!(config.1.is_empty());
    }

    #[test]
    fn none_sentinel_disables_glyph() {
        let config = IconSettings::new().with_icon_text("none").resolve(&table()).unwrap();
        assert!(config.glyph.is_none());
    }

    #[test]
    fn unknown_class_warns_and_drops_glyph() {
        let (config, warnings) = IconSettings::new()
            .with_icon_class("fas fa-nothing")
            .resolve_with_warnings(&table())
            .unwrap();
        assert!(config.glyph.is_none());
        assert_eq!(warnings, vec![RenderWarning::GlyphNotFound("fas fa-nothing".into())]);
    }

    #[test]
    fn zero_width_is_rejected() {
        let result = IconSettings::new().with_icon_width(0).resolve(&table());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn image_scale_is_clamped() {
        let high = IconSettings::new().with_image_scale(3.0).resolve(&table()).unwrap();
        assert_eq!(high.image_scale, 1.0);

        let low = IconSettings::new().with_image_scale(-1.0).resolve(&table()).unwrap();
        assert!(low.image_scale > 0.0);

        let nan = IconSettings::new().with_image_scale(f32::NAN).resolve(&table()).unwrap();
        assert_eq!(nan.image_scale, 1.0);
    }

    #[test]
    fn style_labels() {
        assert_eq!(StyleVariant::from_label("11.0"), Some(StyleVariant::V11));
        assert_eq!(StyleVariant::from_label(" 15.0 "), Some(StyleVariant::V15));
        assert_eq!(StyleVariant::from_label("16.0"), None);
        assert!(StyleVariant::V11.is_flat());
        assert!(!StyleVariant::V12.is_flat());

        let config = IconSettings::new()
            .with_style_variant("10.0")
            .resolve(&table())
            .unwrap();
        assert_eq!(config.style, StyleChoice::Unsupported("10.0".into()));
        assert_eq!(config.style.variant_or_warn("test"), None);
        assert_eq!(config.style.label(), "10.0");
    }

    #[test]
    fn settings_json_format() {
        let settings = IconSettings::new()
            .with_icon_width(64)
            .with_style_variant("11.0")
            .with_icon_background("#123456");

        let json = settings.to_json().unwrap();
        assert!(json.contains("\"iconWidth\":64"));
        assert!(json.contains("\"styleVariant\":\"11.0\""));
        assert!(!json.contains("fontColor"));

        let restored = IconSettings::from_json(&json).unwrap();
        assert_eq!(restored, settings);
    }

    #[test]
    fn empty_settings_deserialize() {
        let settings = IconSettings::from_json("{}").unwrap();
        assert_eq!(settings, IconSettings::default());
    }
}
