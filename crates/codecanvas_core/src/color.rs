//! RGBA colors and CSS color-string parsing
//!
//! Highlighter themes hand out colors as CSS strings (`"#d4d4d4"`,
//! `"#569cd6ff"`, occasionally `rgb(...)` or a keyword). `Color::parse`
//! turns those into the float RGBA the backends draw with.

use std::str::FromStr;
use thiserror::Error;

/// Error returned when a color string cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid color string: {0:?}")]
pub struct ColorParseError(pub String);

/// RGBA color, each channel in 0.0..=1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as u8;
        let g = ((hex >> 8) & 0xFF) as u8;
        let b = (hex & 0xFF) as u8;
        Self::rgba8(r, g, b, 255)
    }

    /// Quantize to 8-bit straight-alpha channels
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Parse a CSS color string (hex, `rgb()`/`rgba()`, or a named color)
    pub fn parse(s: &str) -> Option<Color> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex_color(hex);
        }

        if let Some(body) = strip_function(s, "rgba").or_else(|| strip_function(s, "rgb")) {
            return parse_rgb_function(body);
        }

        parse_named_color(s)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s).ok_or_else(|| ColorParseError(s.to_string()))
    }
}

fn strip_function<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    let rest = s.get(..name.len())?;
    if !rest.eq_ignore_ascii_case(name) {
        return None;
    }
    s[name.len()..]
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        4 => Some(Color::rgba8(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Color::rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

/// `r, g, b[, a]` with channels in 0-255 and alpha in 0-1
fn parse_rgb_function(body: &str) -> Option<Color> {
    let parts: Vec<&str> = body.split(',').map(|p| p.trim()).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |p: &str| -> Option<f32> {
        let v: f32 = p.parse().ok()?;
        v.is_finite().then(|| (v / 255.0).clamp(0.0, 1.0))
    };

    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = match parts.get(3) {
        Some(p) => {
            let a: f32 = p.parse().ok()?;
            if !a.is_finite() {
                return None;
            }
            a.clamp(0.0, 1.0)
        }
        None => 1.0,
    };

    Some(Color::rgba(r, g, b, a))
}

fn parse_named_color(name: &str) -> Option<Color> {
    match name.to_ascii_lowercase().as_str() {
        "black" => Some(Color::BLACK),
        "white" => Some(Color::WHITE),
        "red" => Some(Color::RED),
        "green" => Some(Color::from_hex(0x008000)),
        "lime" => Some(Color::GREEN),
        "blue" => Some(Color::BLUE),
        "yellow" => Some(Color::YELLOW),
        "cyan" | "aqua" => Some(Color::CYAN),
        "magenta" | "fuchsia" => Some(Color::MAGENTA),
        "gray" | "grey" => Some(Color::from_hex(0x808080)),
        "silver" => Some(Color::from_hex(0xC0C0C0)),
        "maroon" => Some(Color::from_hex(0x800000)),
        "olive" => Some(Color::from_hex(0x808000)),
        "navy" => Some(Color::from_hex(0x000080)),
        "purple" => Some(Color::from_hex(0x800080)),
        "teal" => Some(Color::from_hex(0x008080)),
        "orange" => Some(Color::from_hex(0xFFA500)),
        "transparent" => Some(Color::TRANSPARENT),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        assert_eq!(Color::parse("#ff0000"), Some(Color::RED));
        assert_eq!(Color::parse("#00FF00"), Some(Color::GREEN));
        assert_eq!(Color::parse("#1e1e1e").map(|c| c.to_rgba8()), Some([30, 30, 30, 255]));
    }

    #[test]
    fn test_parse_hex_with_alpha() {
        let c = Color::parse("#569cd680").unwrap();
        assert_eq!(c.to_rgba8(), [0x56, 0x9c, 0xd6, 0x80]);

        let short = Color::parse("#f008").unwrap();
        assert_eq!(short.to_rgba8(), [255, 0, 0, 0x88]);
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse("#000"), Some(Color::BLACK));
    }

    #[test]
    fn test_parse_rgb_functions() {
        assert_eq!(
            Color::parse("rgb(255, 0, 0)").map(|c| c.to_rgba8()),
            Some([255, 0, 0, 255])
        );
        assert_eq!(
            Color::parse("rgba(0, 0, 255, 0.5)").map(|c| c.to_rgba8()),
            Some([0, 0, 255, 128])
        );
        assert!(Color::parse("rgb(1, 2)").is_none());
    }

    #[test]
    fn test_parse_named_and_invalid() {
        assert_eq!(Color::parse("Transparent"), Some(Color::TRANSPARENT));
        assert!(Color::parse("#12345").is_none());
        assert!(Color::parse("#gggggg").is_none());
        assert!(Color::parse("not-a-color").is_none());
        assert!("bogus".parse::<Color>().is_err());
    }
}
