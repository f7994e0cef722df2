//! CSS font shorthand descriptors
//!
//! A drawing context's "current font" is a CSS font string such as
//! `"italic bold 13px monospace"`. `FontDescriptor` is the structured form:
//! it renders to that string with a fixed keyword order and parses back.
//! `underline` and `line-through` are not CSS font keywords; they ride along
//! in the same string so a style change is one state update on the context.

use crate::registry::GenericFont;
use crate::{Result, TextError};
use std::fmt;

/// One entry of a comma-separated font-family list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontFamily {
    /// A concrete family name such as "Fira Code"
    Named(String),
    /// A CSS generic family such as `monospace`
    Generic(GenericFont),
}

impl FontFamily {
    fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        let unquoted = entry
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .or_else(|| entry.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')));

        if let Some(name) = unquoted {
            return (!name.is_empty()).then(|| FontFamily::Named(name.to_string()));
        }

        let generic = match entry.to_ascii_lowercase().as_str() {
            "" => return None,
            "monospace" | "ui-monospace" => GenericFont::Monospace,
            "serif" | "ui-serif" => GenericFont::Serif,
            "sans-serif" | "ui-sans-serif" => GenericFont::SansSerif,
            "system-ui" => GenericFont::System,
            "emoji" => GenericFont::Emoji,
            _ => return Some(FontFamily::Named(entry.to_string())),
        };
        Some(FontFamily::Generic(generic))
    }
}

/// Structured form of a CSS font string
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub italic: bool,
    pub bold: bool,
    pub underline: bool,
    pub strikethrough: bool,
    /// Font size in logical pixels
    pub size_px: f32,
    /// Raw family list, e.g. `"'Fira Code', monospace"`
    pub family: String,
}

impl FontDescriptor {
    /// A plain (unstyled) descriptor
    pub fn new(size_px: f32, family: impl Into<String>) -> Self {
        Self {
            italic: false,
            bold: false,
            underline: false,
            strikethrough: false,
            size_px,
            family: family.into(),
        }
    }

    /// Render as a CSS font string
    pub fn to_css(&self) -> String {
        self.to_string()
    }

    /// Parse a CSS font string produced by `to_css` (or written by hand)
    ///
    /// Leading keywords are matched case-insensitively; `normal` is accepted
    /// and ignored. The first `<number>px` token is the size, everything after
    /// it is the family list.
    pub fn parse(css: &str) -> Result<Self> {
        let invalid = || TextError::InvalidFontDescriptor(css.to_string());
        let mut descriptor = FontDescriptor::new(0.0, String::new());

        let mut rest = css.trim();
        loop {
            let (word, tail) = match rest.find(char::is_whitespace) {
                Some(i) => (&rest[..i], rest[i..].trim_start()),
                None => (rest, ""),
            };
            if word.is_empty() {
                return Err(invalid());
            }

            match word.to_ascii_lowercase().as_str() {
                "italic" | "oblique" => descriptor.italic = true,
                "bold" | "bolder" | "700" | "800" | "900" => descriptor.bold = true,
                "underline" => descriptor.underline = true,
                "line-through" => descriptor.strikethrough = true,
                "normal" => {}
                size => {
                    let value = size.strip_suffix("px").ok_or_else(invalid)?;
                    let size_px: f32 = value.parse().map_err(|_| invalid())?;
                    if !size_px.is_finite() || size_px <= 0.0 || tail.is_empty() {
                        return Err(invalid());
                    }
                    descriptor.size_px = size_px;
                    descriptor.family = tail.to_string();
                    return Ok(descriptor);
                }
            }
            rest = tail;
        }
    }

    /// The family list, in fallback order
    pub fn families(&self) -> Vec<FontFamily> {
        self.family.split(',').filter_map(FontFamily::parse).collect()
    }

    /// CSS numeric weight for face lookup
    pub fn weight(&self) -> u16 {
        if self.bold {
            700
        } else {
            400
        }
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.italic {
            f.write_str("italic ")?;
        }
        if self.bold {
            f.write_str("bold ")?;
        }
        if self.underline {
            f.write_str("underline ")?;
        }
        if self.strikethrough {
            f.write_str("line-through ")?;
        }
        write!(f, "{}px {}", self.size_px, self.family)
    }
}
