//! Codecanvas drawing surfaces
//!
//! A small Canvas-2D-like API: a [`Surface`] owns a backing store sized in
//! physical pixels and hands out a [`DrawingContext`] whose state (transform,
//! text baseline, font, letter spacing, fill style) persists between calls
//! until the backing store is resized.
//!
//! Two backends are provided:
//!
//! - [`RecordingSurface`] records [`DrawCommand`]s and measures text with a
//!   deterministic estimate, for tests and for replaying elsewhere
//! - [`PixmapSurface`] rasterizes into a tiny-skia pixmap with real glyphs
//!
//! # Example
//!
//! ```ignore
//! use codecanvas_paint::{DrawingContext, RecordingSurface, Surface};
//! use codecanvas_core::{Color, Rect, Size};
//!
//! let mut surface = RecordingSurface::new(Size::new(200.0, 100.0), 2.0);
//! surface.set_backing_size(400, 200)?;
//! if let Some(ctx) = surface.context() {
//!     ctx.scale(2.0, 2.0);
//!     ctx.set_fill_style(Color::BLACK);
//!     ctx.fill_rect(Rect::new(0.0, 0.0, 200.0, 100.0));
//! }
//! ```

pub mod context;
pub mod error;
pub mod pixmap;
pub mod recording;

pub use context::{physical_size, ContextState, DrawingContext, Surface};
pub use error::{PaintError, Result};
pub use pixmap::{PixmapContext, PixmapSurface};
pub use recording::{DrawCommand, RecordingContext, RecordingSurface};
