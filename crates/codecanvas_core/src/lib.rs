//! Codecanvas Core
//!
//! Foundational types shared by every codecanvas crate:
//!
//! - **Geometry**: `Point`, `Size` and `Rect` in logical (CSS) pixels
//! - **Color**: RGBA colors and CSS color-string parsing
//! - **Transform**: 2D affine transforms used for device-pixel scaling
//! - **Tokens**: the highlighted-token model (`Token`, `Line`, `Document`)
//!   consumed by the renderer
//!
//! # Example
//!
//! ```rust
//! use codecanvas_core::{Color, Document, FontStyle, Token};
//!
//! let doc = Document::from_lines(vec![vec![
//!     Token::new("fn", Some("#569cd6")).with_font_style(FontStyle::BOLD),
//!     Token::new(" main", Some("#dcdcaa")),
//! ]]);
//!
//! assert_eq!(doc.line_count(), 1);
//! assert_eq!(Color::parse("#ff0000"), Some(Color::RED));
//! ```

pub mod color;
pub mod geometry;
pub mod token;
pub mod transform;

pub use color::{Color, ColorParseError};
pub use geometry::{Point, Rect, Size};
pub use token::{Document, FontStyle, Line, Token};
pub use transform::{Affine2D, TextBaseline};
