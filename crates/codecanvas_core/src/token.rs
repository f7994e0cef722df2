//! Highlighted-token model
//!
//! The shape an external highlighter hands to the renderer: a document is an
//! ordered list of lines, a line an ordered list of tokens, and each token a
//! run of text sharing one color and one style bitmask. Serializes to the
//! highlighter's JSON form (`[[{"content": .., "color": .., "fontStyle": ..}]]`).

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Font style bitmask attached to a token
    ///
    /// Bits combine freely (a bold-italic token carries `BOLD | ITALIC`).
    /// Values follow the highlighter's numbering.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FontStyle: u8 {
        const ITALIC = 1;
        const BOLD = 1 << 1;
        const UNDERLINE = 1 << 2;
        const STRIKETHROUGH = 1 << 3;
    }
}

impl FontStyle {
    /// The "no style" value
    pub const NONE: FontStyle = FontStyle::empty();

    /// Build from the highlighter's integer, where negative means "not set"
    pub fn from_raw(raw: i64) -> Self {
        if raw <= 0 {
            FontStyle::empty()
        } else {
            FontStyle::from_bits_retain((raw & 0xFF) as u8)
        }
    }
}

impl Serialize for FontStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for FontStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Ok(FontStyle::from_raw(raw))
    }
}

/// A contiguous run of source text sharing one color and one style
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Text of the run
    pub content: String,
    /// CSS color string; `None` marks structural/whitespace runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub font_style: FontStyle,
}

impl Token {
    pub fn new(content: impl Into<String>, color: Option<&str>) -> Self {
        Self {
            content: content.into(),
            color: color.map(str::to_string),
            font_style: FontStyle::NONE,
        }
    }

    /// A token with no color
    pub fn uncolored(content: impl Into<String>) -> Self {
        Self::new(content, None)
    }

    pub fn with_font_style(mut self, style: FontStyle) -> Self {
        self.font_style = style;
        self
    }
}

/// One visual row of tokens, left to right
pub type Line = Vec<Token>;

/// Ordered lines, top to bottom
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    lines: Vec<Line>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<Line>> for Document {
    fn from(lines: Vec<Line>) -> Self {
        Self::from_lines(lines)
    }
}
