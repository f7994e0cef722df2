//! Text shaping using rustybuzz (HarfBuzz)
//!
//! Produces positioned glyph runs with kerning and ligatures applied.
//! Positions are converted to pixels at shaping time.

use crate::font::FontFace;
use rustybuzz::UnicodeBuffer;

/// A glyph with its placement in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: u16,
    /// Byte offset of the source cluster
    pub cluster: u32,
    pub x_advance: f32,
    /// Offset from the pen position (combining marks etc.)
    pub x_offset: f32,
    /// Upward offset from the baseline
    pub y_offset: f32,
}

/// A shaped run at one font size
#[derive(Debug, Clone, Default)]
pub struct ShapedText {
    /// Glyphs in visual order
    pub glyphs: Vec<ShapedGlyph>,
    pub font_size: f32,
}

impl ShapedText {
    /// Sum of advances, without letter spacing
    pub fn advance(&self) -> f32 {
        self.glyphs.iter().map(|g| g.x_advance).sum()
    }

    /// Each glyph with its pen position, `letter_spacing` px added after every glyph
    pub fn pen_positions(&self, letter_spacing: f32) -> impl Iterator<Item = (f32, &ShapedGlyph)> + '_ {
        self.glyphs.iter().scan(0.0f32, move |pen, glyph| {
            let at = *pen;
            *pen += glyph.x_advance + letter_spacing;
            Some((at, glyph))
        })
    }
}

/// Text shaper using HarfBuzz via rustybuzz
#[derive(Debug, Default)]
pub struct TextShaper {}

impl TextShaper {
    pub fn new() -> Self {
        Self {}
    }

    /// Shape `text` with `face` at `font_size` pixels
    pub fn shape(&self, text: &str, face: &FontFace, font_size: f32) -> ShapedText {
        let px = font_size / face.metrics().units_per_em as f32;

        let Some(hb_face) = rustybuzz::Face::from_slice(face.data(), face.face_index()) else {
            tracing::debug!("rustybuzz rejected {:?}; using cmap advances", face);
            return self.shape_by_cmap(text, face, font_size);
        };

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        let output = rustybuzz::shape(&hb_face, &[], buffer);

        let glyphs = output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id as u16,
                cluster: info.cluster,
                x_advance: pos.x_advance as f32 * px,
                x_offset: pos.x_offset as f32 * px,
                y_offset: pos.y_offset as f32 * px,
            })
            .collect();

        ShapedText { glyphs, font_size }
    }

    /// One glyph per char with nominal advances; no kerning or ligatures
    fn shape_by_cmap(&self, text: &str, face: &FontFace, font_size: f32) -> ShapedText {
        let px = font_size / face.metrics().units_per_em as f32;
        let glyphs = text
            .char_indices()
            .map(|(offset, c)| {
                let glyph_id = face.glyph_id(c).unwrap_or(0);
                let advance = face
                    .glyph_advance(glyph_id)
                    .map_or(font_size * 0.5, |a| a as f32 * px);
                ShapedGlyph {
                    glyph_id,
                    cluster: offset as u32,
                    x_advance: advance,
                    x_offset: 0.0,
                    y_offset: 0.0,
                }
            })
            .collect();

        ShapedText { glyphs, font_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FontRegistry, GenericFont};

    fn glyph(x_advance: f32) -> ShapedGlyph {
        ShapedGlyph {
            glyph_id: 1,
            cluster: 0,
            x_advance,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }

    #[test]
    fn test_pen_positions_with_spacing() {
        let run = ShapedText {
            glyphs: vec![glyph(5.0), glyph(3.0), glyph(4.0)],
            font_size: 10.0,
        };
        let pens: Vec<f32> = run.pen_positions(1.0).map(|(pen, _)| pen).collect();
        assert_eq!(pens, vec![0.0, 6.0, 10.0]);
        assert_eq!(run.advance(), 12.0);
    }

    #[test]
    fn test_shape_monospace_advances_are_uniform() {
        let mut registry = FontRegistry::new();
        let Ok(face) = registry.load_generic(GenericFont::Monospace) else {
            println!("No monospace font available - skipping test (CI environment)");
            return;
        };

        let shaped = TextShaper::new().shape("abc", &face, 13.0);
        assert_eq!(shaped.glyphs.len(), 3);
        let first = shaped.glyphs[0].x_advance;
        assert!(first > 0.0);
        assert!(shaped.glyphs.iter().all(|g| g.x_advance == first));
        assert_eq!(shaped.glyphs[2].cluster, 2);

        let empty = TextShaper::new().shape("", &face, 13.0);
        assert!(empty.glyphs.is_empty());
        assert_eq!(empty.advance(), 0.0);
    }
}
