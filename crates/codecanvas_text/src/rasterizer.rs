//! Glyph rasterization using swash
//!
//! Converts font glyph outlines to 8-bit coverage masks.

use crate::font::FontFace;
use crate::{Result, TextError};
use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::Format;

/// Rasterized glyph coverage mask with placement
#[derive(Debug, Clone)]
pub struct RasterizedGlyph {
    /// Coverage values (grayscale, 8-bit, row-major)
    pub bitmap: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Offset from the pen position to the left edge
    pub bearing_x: i32,
    /// Offset from the baseline up to the top edge
    pub bearing_y: i32,
}

impl RasterizedGlyph {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Glyph rasterizer using swash
pub struct GlyphRasterizer {
    /// Swash scale context (caches scaling state)
    scale_context: ScaleContext,
}

impl GlyphRasterizer {
    pub fn new() -> Self {
        Self {
            scale_context: ScaleContext::new(),
        }
    }

    /// Outline growth applied by `embolden`, in pixels at `font_size`
    pub fn embolden_strength(font_size: f32) -> f32 {
        font_size / 24.0
    }

    /// Rasterize a glyph at the given pixel size
    ///
    /// `embolden` thickens the outline for faces that lack a real bold cut.
    pub fn rasterize(
        &mut self,
        font: &FontFace,
        glyph_id: u16,
        font_size: f32,
        embolden: bool,
    ) -> Result<RasterizedGlyph> {
        let swash_font = swash::FontRef::from_index(font.data(), font.face_index() as usize)
            .ok_or(TextError::InvalidFontData)?;

        let mut scaler = self
            .scale_context
            .builder(swash_font)
            .size(font_size)
            .hint(false)
            .build();

        // Outline only: color sources would produce RGBA instead of coverage
        let mut render = Render::new(&[Source::Outline]);
        render.format(Format::Alpha);
        if embolden {
            render.embolden(Self::embolden_strength(font_size));
        }

        match render.render(&mut scaler, glyph_id) {
            Some(img) => Ok(RasterizedGlyph {
                bitmap: img.data,
                width: img.placement.width,
                height: img.placement.height,
                bearing_x: img.placement.left,
                bearing_y: img.placement.top,
            }),
            // Blank glyph (like space)
            None => Ok(RasterizedGlyph {
                bitmap: Vec::new(),
                width: 0,
                height: 0,
                bearing_x: 0,
                bearing_y: 0,
            }),
        }
    }
}

impl Default for GlyphRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FontRegistry, GenericFont};

    #[test]
    fn test_rasterize_visible_and_blank_glyphs() {
        let mut registry = FontRegistry::new();
        let Ok(face) = registry.load_generic(GenericFont::Monospace) else {
            println!("No monospace font available - skipping test (CI environment)");
            return;
        };
        let mut rasterizer = GlyphRasterizer::new();

        let m = face.glyph_id('M').unwrap();
        let glyph = rasterizer.rasterize(&face, m, 26.0, false).unwrap();
        assert!(!glyph.is_empty());
        assert_eq!(glyph.bitmap.len(), (glyph.width * glyph.height) as usize);
        assert!(glyph.bearing_y > 0);

        let space = face.glyph_id(' ').unwrap();
        let blank = rasterizer.rasterize(&face, space, 26.0, false).unwrap();
        assert!(blank.is_empty());
    }
}
