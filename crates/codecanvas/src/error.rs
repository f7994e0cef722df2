//! Render error types

use codecanvas_paint::PaintError;
use thiserror::Error;

/// Error returned by an external collaborator (tokenizer or theme resolver)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort a render call
#[derive(Error, Debug)]
pub enum RenderError {
    /// Options failed validation; nothing was drawn
    #[error("Invalid render options: {0}")]
    InvalidConfig(String),

    #[error("Failed to tokenize '{lang}' source: {source}")]
    Tokenize { lang: String, source: BoxError },

    #[error("Failed to resolve theme '{theme}': {source}")]
    Theme { theme: String, source: BoxError },

    /// The theme resolved, but its background is not a color we can parse
    #[error("Theme '{theme}' has an invalid background color {value:?}")]
    InvalidColor { theme: String, value: String },

    /// The surface could not allocate its backing store
    #[error(transparent)]
    Paint(#[from] PaintError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
