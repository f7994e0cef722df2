//! Paint error types

use codecanvas_text::TextError;
use thiserror::Error;

/// Errors raised by drawing surfaces
#[derive(Error, Debug)]
pub enum PaintError {
    /// The backing store could not be allocated at this size
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Text(#[from] TextError),
}

pub type Result<T> = std::result::Result<T, PaintError>;
