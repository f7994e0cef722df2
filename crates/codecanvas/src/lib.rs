//! Codecanvas
//!
//! Paints syntax-highlighted source code onto a raster surface. An external
//! highlighter supplies lines of colored, styled tokens and a theme
//! background; codecanvas lays them out and draws them:
//!
//! 1. **Configure** the surface: backing store sized to logical size times
//!    the device pixel ratio, context pre-scaled so drawing is in logical
//!    units, top text baseline, base font and letter spacing. With auto-size
//!    the logical size is computed from the content first.
//! 2. **Fill** the render region with the theme background.
//! 3. **Render** each line at `padding + index * line_height`, advancing a
//!    per-line cursor by each token's measured width.
//!
//! # Example
//!
//! ```ignore
//! use codecanvas::{PlainTokenizer, RenderOptions, RenderRequest, Renderer, ThemeTable};
//! use codecanvas_paint::PixmapSurface;
//! use codecanvas_core::Size;
//!
//! let renderer = Renderer::new(
//!     PlainTokenizer::new(Some("#d4d4d4")),
//!     ThemeTable::new().with_theme("dark-plus", "#1e1e1e"),
//! );
//! let mut surface = PixmapSurface::new(Size::new(400.0, 200.0), 2.0)?;
//! let request = RenderRequest::new("fn main() {}", "rust", "dark-plus");
//! let options = RenderOptions::new().with_padding(12.0, 8.0).with_auto_size(true);
//!
//! renderer.render(&mut surface, &request, &options).await?;
//! ```

pub mod compositor;
pub mod config;
pub mod error;
pub mod highlight;
pub mod line;
pub mod render;
pub mod surface;

pub use compositor::{fill_background, resolve_background};
pub use config::{
    RegionOverride, RenderConfig, RenderOptions, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE,
    DEFAULT_LINE_HEIGHT_FACTOR,
};
pub use error::{BoxError, RenderError, Result};
pub use highlight::{HighlightError, PlainTokenizer, StaticTokenizer, ThemeResolver, ThemeTable, Tokenizer};
pub use line::{effective_font, measure_line, render_line, token_color};
pub use render::{paint_document, RenderRequest, Renderer, SurfaceLock};
pub use surface::{configure, content_size, Configured};

// Re-export the building blocks callers need alongside the engine
pub use codecanvas_core::{Color, Document, FontStyle, Line, Point, Rect, Size, Token};
pub use codecanvas_paint::{DrawingContext, PixmapSurface, RecordingSurface, Surface};
pub use codecanvas_text::FontDescriptor;
