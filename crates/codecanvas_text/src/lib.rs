//! Text support for codecanvas
//!
//! This crate provides:
//! - Font loading and parsing (TTF/OTF via ttf-parser)
//! - System font discovery and caching (fontdb)
//! - Text shaping (HarfBuzz via rustybuzz)
//! - Glyph rasterization (swash)
//! - CSS font shorthand descriptors and text measurement

pub mod descriptor;
pub mod font;
pub mod measure;
pub mod rasterizer;
pub mod registry;
pub mod shaper;

pub use descriptor::{FontDescriptor, FontFamily};
pub use font::{FontFace, FontMetrics, GlyphBounds};
pub use measure::{measure_with_face, EstimatedTextMeasurer, TextMeasurer, TextMetrics};
pub use rasterizer::{GlyphRasterizer, RasterizedGlyph};
pub use registry::{FontRegistry, GenericFont};
pub use shaper::{ShapedGlyph, ShapedText, TextShaper};

use thiserror::Error;

/// Text errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Failed to load font: {0}")]
    FontLoadError(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid font data")]
    InvalidFontData,

    #[error("Invalid font descriptor: {0:?}")]
    InvalidFontDescriptor(String),
}

pub type Result<T> = std::result::Result<T, TextError>;
