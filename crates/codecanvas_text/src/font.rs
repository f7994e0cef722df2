//! Parsed font faces
//!
//! A `FontFace` owns its font bytes and the handful of metrics the renderer
//! needs: vertical extents for baseline placement and the decoration lines.
//! Glyph queries re-parse the table directory through ttf-parser on demand.

use crate::{Result, TextError};
use std::sync::Arc;
use ttf_parser::GlyphId;

/// OS/2 weights at or above this count as a real bold cut
const BOLD_WEIGHT: u16 = 600;

/// Vertical font metrics in font units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: u16,
    /// Baseline to top of the em box (positive)
    pub ascender: i16,
    /// Baseline to bottom of the em box (typically negative)
    pub descender: i16,
    /// Underline position relative to the baseline (typically negative)
    pub underline_position: Option<i16>,
    pub underline_thickness: Option<i16>,
    /// Strikeout position above the baseline
    pub strikeout_position: Option<i16>,
    pub strikeout_thickness: Option<i16>,
}

impl FontMetrics {
    /// Font units to pixels at `font_size`
    pub fn scale(&self, value: i16, font_size: f32) -> f32 {
        value as f32 * font_size / self.units_per_em as f32
    }

    pub fn ascender_px(&self, font_size: f32) -> f32 {
        self.scale(self.ascender, font_size)
    }

    /// Typically negative
    pub fn descender_px(&self, font_size: f32) -> f32 {
        self.scale(self.descender, font_size)
    }

    /// Underline offset below the baseline and its thickness, in pixels
    pub fn underline_px(&self, font_size: f32) -> (f32, f32) {
        let offset = match self.underline_position {
            Some(p) => -self.scale(p, font_size),
            None => font_size * 0.1,
        };
        (offset, self.decoration_thickness(self.underline_thickness, font_size))
    }

    /// Strikeout offset above the baseline and its thickness, in pixels
    pub fn strikeout_px(&self, font_size: f32) -> (f32, f32) {
        let offset = match self.strikeout_position {
            Some(p) => self.scale(p, font_size),
            None => font_size * 0.3,
        };
        (offset, self.decoration_thickness(self.strikeout_thickness, font_size))
    }

    fn decoration_thickness(&self, thickness: Option<i16>, font_size: f32) -> f32 {
        thickness
            .map(|t| self.scale(t, font_size))
            .unwrap_or(font_size / 14.0)
            .max(1.0 / 16.0)
    }
}

/// Horizontal ink extents of a glyph, in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphBounds {
    pub x_min: i16,
    pub x_max: i16,
}

/// A parsed font face and the bytes backing it
pub struct FontFace {
    data: Arc<Vec<u8>>,
    /// Index within a collection (TTC) file
    face_index: u32,
    metrics: FontMetrics,
    family: String,
    /// OS/2 weight class (400 when the table is missing)
    weight: u16,
    italic: bool,
}

impl FontFace {
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_with_index(data, 0)
    }

    /// Parse face `face_index` of a font or font collection
    pub fn from_data_with_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let data = Arc::new(data);
        let face = ttf_parser::Face::parse(&data, face_index)
            .map_err(|e| TextError::FontParseError(format!("{:?}", e)))?;

        let underline = face.underline_metrics();
        let strikeout = face.strikeout_metrics();
        let metrics = FontMetrics {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            underline_position: underline.map(|m| m.position),
            underline_thickness: underline.map(|m| m.thickness),
            strikeout_position: strikeout.map(|m| m.position),
            strikeout_thickness: strikeout.map(|m| m.thickness),
        };
        if metrics.units_per_em == 0 {
            return Err(TextError::InvalidFontData);
        }

        let family = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == ttf_parser::name_id::FAMILY)
            .find_map(|name| name.to_string())
            .unwrap_or_default();
        let weight = face
            .tables()
            .os2
            .map_or(400, |os2| os2.weight().to_number());
        let italic = face.is_italic() || face.is_oblique();

        Ok(Self {
            data,
            face_index,
            metrics,
            family,
            weight,
            italic,
        })
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Family name from the `name` table; empty if absent
    pub fn family_name(&self) -> &str {
        &self.family
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Whether this face is a real bold cut (rather than needing emboldening)
    pub fn is_bold(&self) -> bool {
        self.weight >= BOLD_WEIGHT
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    fn parsed(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.face_index).ok()
    }

    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.parsed()?.glyph_index(c).map(|id| id.0)
    }

    /// Horizontal advance in font units
    pub fn glyph_advance(&self, glyph_id: u16) -> Option<u16> {
        self.parsed()?.glyph_hor_advance(GlyphId(glyph_id))
    }

    /// Horizontal ink extents; `None` for blank glyphs
    pub fn glyph_bounds(&self, glyph_id: u16) -> Option<GlyphBounds> {
        let bbox = self.parsed()?.glyph_bounding_box(GlyphId(glyph_id))?;
        Some(GlyphBounds {
            x_min: bbox.x_min,
            x_max: bbox.x_max,
        })
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("italic", &self.italic)
            .field("face_index", &self.face_index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_font_data() {
        let err = FontFace::from_data(vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, TextError::FontParseError(_)));
    }

    #[test]
    fn test_metrics_scale() {
        let m = FontMetrics {
            units_per_em: 1000,
            ascender: 800,
            descender: -200,
            underline_position: Some(-100),
            underline_thickness: Some(50),
            strikeout_position: None,
            strikeout_thickness: None,
        };
        assert_eq!(m.ascender_px(10.0), 8.0);
        assert_eq!(m.descender_px(10.0), -2.0);
        assert_eq!(m.underline_px(10.0), (1.0, 0.5));
        assert_eq!(m.strikeout_px(10.0).0, 3.0);
    }

    #[test]
    fn test_thin_decorations_are_clamped() {
        let m = FontMetrics {
            units_per_em: 2048,
            ascender: 1900,
            descender: -500,
            underline_position: None,
            underline_thickness: Some(0),
            strikeout_position: None,
            strikeout_thickness: None,
        };
        assert_eq!(m.underline_px(14.0), (14.0 * 0.1, 1.0 / 16.0));
        assert_eq!(m.strikeout_px(14.0), (14.0 * 0.3, 1.0));
    }
}
