//! Text measurement
//!
//! Mirrors a 2D canvas `measureText` result: the advance width plus the
//! actual ink extents either side of the origin. Glyphs such as italic
//! swashes can overflow their advance box, so callers that lay out runs
//! side by side use `rendered_width`.

use crate::descriptor::{FontDescriptor, FontFamily};
use crate::font::FontFace;
use crate::rasterizer::GlyphRasterizer;
use crate::registry::GenericFont;
use crate::shaper::TextShaper;

/// Text measurement result, in logical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width, including letter spacing
    pub width: f32,
    /// Ink extent to the left of the origin (positive = extends left)
    pub actual_bounding_box_left: f32,
    /// Ink extent to the right of the origin
    pub actual_bounding_box_right: f32,
    pub font_bounding_box_ascent: f32,
    pub font_bounding_box_descent: f32,
}

impl TextMetrics {
    /// The larger of the advance width and the ink width
    pub fn rendered_width(&self) -> f32 {
        self.width
            .max(self.actual_bounding_box_left + self.actual_bounding_box_right)
    }
}

/// Trait for measuring text dimensions
pub trait TextMeasurer: Send + Sync {
    /// Measure `text` set in `font` with `letter_spacing` px after each glyph
    fn measure(&self, text: &str, font: &FontDescriptor, letter_spacing: f32) -> TextMetrics;
}

/// A font-free text measurer that uses fixed per-character estimates
///
/// Deterministic, so it backs the recording context used in tests.
/// Monospace families advance `0.6em` per character, others `0.55em`.
/// Italic text overhangs its advance box by `0.1em` on the right.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedTextMeasurer;

impl EstimatedTextMeasurer {
    pub const MONOSPACE_ADVANCE: f32 = 0.6;
    pub const PROPORTIONAL_ADVANCE: f32 = 0.55;
    pub const ITALIC_OVERHANG: f32 = 0.1;

    fn advance_factor(font: &FontDescriptor) -> f32 {
        let monospace = font
            .families()
            .first()
            .map(|f| *f == FontFamily::Generic(GenericFont::Monospace))
            .unwrap_or(true);
        if monospace {
            Self::MONOSPACE_ADVANCE
        } else {
            Self::PROPORTIONAL_ADVANCE
        }
    }
}

impl TextMeasurer for EstimatedTextMeasurer {
    fn measure(&self, text: &str, font: &FontDescriptor, letter_spacing: f32) -> TextMetrics {
        let char_count = text.chars().count() as f32;
        let ink = char_count * font.size_px * Self::advance_factor(font);
        let overhang = if font.italic && char_count > 0.0 {
            font.size_px * Self::ITALIC_OVERHANG
        } else {
            0.0
        };

        TextMetrics {
            width: ink + char_count * letter_spacing,
            actual_bounding_box_left: 0.0,
            actual_bounding_box_right: ink + overhang,
            font_bounding_box_ascent: font.size_px * 0.8,
            font_bounding_box_descent: font.size_px * 0.2,
        }
    }
}

/// Measure text against a real face using shaped advances and glyph boxes
///
/// With `embolden`, the ink box grows on both sides by the outline growth
/// [`GlyphRasterizer`] applies to synthetic bold.
pub fn measure_with_face(
    face: &FontFace,
    shaper: &TextShaper,
    text: &str,
    font_size: f32,
    letter_spacing: f32,
    embolden: bool,
) -> TextMetrics {
    let shaped = shaper.shape(text, face, font_size);
    let metrics = face.metrics();

    let mut ink: Option<(f32, f32)> = None;
    for (pen, glyph) in shaped.pen_positions(letter_spacing) {
        let Some(bounds) = face.glyph_bounds(glyph.glyph_id) else {
            continue;
        };
        let origin = pen + glyph.x_offset;
        let x0 = origin + metrics.scale(bounds.x_min, font_size);
        let x1 = origin + metrics.scale(bounds.x_max, font_size);
        ink = Some(match ink {
            Some((lo, hi)) => (lo.min(x0), hi.max(x1)),
            None => (x0, x1),
        });
    }
    let width = shaped.advance() + letter_spacing * shaped.glyphs.len() as f32;

    let grow = if embolden {
        GlyphRasterizer::embolden_strength(font_size)
    } else {
        0.0
    };
    let (left, right) = ink
        .map(|(lo, hi)| (grow - lo, hi + grow))
        .unwrap_or((0.0, 0.0));

    TextMetrics {
        width,
        actual_bounding_box_left: left,
        actual_bounding_box_right: right,
        font_bounding_box_ascent: metrics.ascender_px(font_size),
        font_bounding_box_descent: -metrics.descender_px(font_size),
    }
}
