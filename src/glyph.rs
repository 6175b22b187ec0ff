//! Icon-font glyphs: lookup, rasterization and tinting.
//!
//! Font loading belongs to the platform. The renderer only needs two things
//! from it: a [`GlyphLookup`] that maps an icon class to a codepoint and
//! weight, and a [`GlyphRasterizer`] that turns that glyph into coverage.
//! [`SvgTextRasterizer`] is the stock rasterizer; it lays the glyph out as an
//! SVG `<text>` element and renders it with resvg against a font database.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{fontdb, Options, Tree};
use serde::{Deserialize, Serialize};

use crate::color::ParsedColor;
use crate::config::Glyph;
use crate::surface::premultiply;

// ============================================================================
// Lookup
// ============================================================================

/// Codepoint and weight for an icon class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct GlyphMetrics {
    pub codepoint: String,
    pub font_weight: u16,
}

impl GlyphMetrics {
    pub fn new(codepoint: impl Into<String>, font_weight: u16) -> Self {
        Self {
            codepoint: codepoint.into(),
            font_weight,
        }
    }
}

/// The platform's glyph-metrics provider.
pub trait GlyphLookup {
    /// Resolves once fonts are loaded and glyphs can be measured.
    ///
    /// The default implementation is ready immediately.
    fn ready(&self) -> impl Future<Output = ()> {
        std::future::ready(())
    }

    /// Returns the glyph for an icon class such as `"fas fa-carrot"`.
    fn lookup_glyph(&self, icon_class: &str) -> Option<GlyphMetrics>;
}

/// A [`GlyphLookup`] backed by an in-memory table.
///
/// Serializes as a flat JSON object keyed by class name:
///
/// ```json
/// { "fas fa-address-card": { "codepoint": "\uf2bb", "fontWeight": 900 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlyphTable {
    entries: HashMap<String, GlyphMetrics>,
}

impl GlyphTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, icon_class: &str, metrics: GlyphMetrics) {
        self.entries.insert(normalize_class(icon_class), metrics);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, GlyphMetrics> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (class, metrics) in raw {
            table.insert(&class, metrics);
        }
        Ok(table)
    }
}

impl GlyphLookup for GlyphTable {
    fn lookup_glyph(&self, icon_class: &str) -> Option<GlyphMetrics> {
        self.entries.get(&normalize_class(icon_class)).cloned()
    }
}

fn normalize_class(icon_class: &str) -> String {
    icon_class.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Rasterization
// ============================================================================

/// Turns a glyph into coverage.
pub trait GlyphRasterizer {
    /// Renders `glyph` in opaque white on a transparent `canvas × canvas`
    /// pixmap, centered horizontally and vertically.
    ///
    /// Returns `None` if the glyph cannot be laid out.
    fn rasterize(&self, glyph: &Glyph, font_size: f32, canvas: u32) -> Option<Pixmap>;
}

/// Rasterizes glyphs through resvg's text layout.
#[derive(Clone)]
pub struct SvgTextRasterizer {
    fontdb: Arc<fontdb::Database>,
}

impl SvgTextRasterizer {
    pub fn new(fontdb: Arc<fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// Creates a rasterizer over the fonts installed on this system.
    pub fn with_system_fonts() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("loaded {} system font faces", db.len());
        Self::new(Arc::new(db))
    }

    pub fn font_count(&self) -> usize {
        self.fontdb.len()
    }
}

impl GlyphRasterizer for SvgTextRasterizer {
    fn rasterize(&self, glyph: &Glyph, font_size: f32, canvas: u32) -> Option<Pixmap> {
        let svg = glyph_svg(glyph, font_size, canvas);

        let mut options = Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        let tree = match Tree::from_str(&svg, &options) {
            Ok(tree) => tree,
            Err(err) => {
                log::warn!("glyph layout failed: {err}");
                return None;
            }
        };

        let mut pixmap = Pixmap::new(canvas, canvas)?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Some(pixmap)
    }
}

/// Builds a one-element SVG document drawing the glyph at the canvas center.
fn glyph_svg(glyph: &Glyph, font_size: f32, canvas: u32) -> String {
    let center = canvas as f32 / 2.0;
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{canvas}" height="{canvas}" viewBox="0 0 {canvas} {canvas}"><text x="{center}" y="{center}" font-family="{family}" font-weight="{weight}" font-size="{font_size}" text-anchor="middle" dominant-baseline="central" fill="#ffffff">{text}</text></svg>"##,
        family = escape_xml(&css_family(&glyph.font_family)),
        weight = glyph.font_weight,
        text = escape_xml(&glyph.text),
    )
}

/// Quotes a family name unless it is a CSS generic family.
fn css_family(family: &str) -> String {
    const GENERIC: [&str; 5] = ["serif", "sans-serif", "monospace", "cursive", "fantasy"];
    if GENERIC.contains(&family) {
        family.to_string()
    } else {
        format!("'{family}'")
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// GlyphStamp
// ============================================================================

/// Rasterized glyph coverage that can be stamped in any color.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphStamp {
    coverage: Pixmap,
}

impl GlyphStamp {
    /// Wraps white coverage produced by a [`GlyphRasterizer`].
    pub fn new(coverage: Pixmap) -> Self {
        Self { coverage }
    }

    pub fn coverage(&self) -> &Pixmap {
        &self.coverage
    }

    /// True if the glyph left no visible pixels.
    pub fn is_blank(&self) -> bool {
        self.coverage.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Returns the glyph filled with `color`.
    ///
    /// Coverage becomes alpha, scaled by the color's own alpha.
    pub fn tinted(&self, color: &ParsedColor) -> Pixmap {
        let mut out = self.coverage.clone();
        let color_alpha = u16::from(color.alpha_u8());
        let rgb = [color.rgb.red, color.rgb.green, color.rgb.blue];

        for pixel in out.data_mut().chunks_exact_mut(4) {
            let alpha = ((u16::from(pixel[3]) * color_alpha + 127) / 255) as u8;
            pixel[0] = premultiply(rgb[0], alpha);
            pixel[1] = premultiply(rgb[1], alpha);
            pixel[2] = premultiply(rgb[2], alpha);
            pixel[3] = alpha;
        }
        out
    }
}

// ============================================================================
// Tests
// ============================================================================
