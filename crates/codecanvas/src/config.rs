//! Render options and their resolved form
//!
//! [`RenderOptions`] is the caller-facing bag of optional settings, loadable
//! from JSON or TOML in camelCase. [`RenderOptions::resolve`] fills in the
//! defaults and validates everything once, producing an immutable
//! [`RenderConfig`] for the duration of a render call.

use codecanvas_core::{Point, Rect, Size};
use codecanvas_text::FontDescriptor;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

pub const DEFAULT_FONT_FAMILY: &str = "monospace";
pub const DEFAULT_FONT_SIZE: f32 = 13.0;
/// Line height as a multiple of the font size
pub const DEFAULT_LINE_HEIGHT_FACTOR: f32 = 1.5;

/// Optional render settings
///
/// Unset fields take the documented defaults. `lineHight` is accepted as an
/// alias of `lineHeight` for option blobs written against older callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Region left edge (default 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Region top edge (default 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Region width (default: surface width)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<f32>,
    /// Region height (default: surface height)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(alias = "lineHight", skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,
    /// `[horizontal, vertical]` padding inside the region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<[f32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_size: Option<bool>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the whole render region
    pub fn with_region(mut self, region: Rect) -> Self {
        self.x = Some(region.x());
        self.y = Some(region.y());
        self.w = Some(region.width());
        self.h = Some(region.height());
        self
    }

    /// Override only the region origin
    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_line_height(mut self, height: f32) -> Self {
        self.line_height = Some(height);
        self
    }

    pub fn with_letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = Some(spacing);
        self
    }

    pub fn with_padding(mut self, horizontal: f32, vertical: f32) -> Self {
        self.padding = Some([horizontal, vertical]);
        self
    }

    pub fn with_auto_size(mut self, auto_size: bool) -> Self {
        self.auto_size = Some(auto_size);
        self
    }

    /// Apply defaults and validate against the surface's bounding box
    pub fn resolve(&self, bounding_box: Size) -> Result<RenderConfig> {
        let font_family = self
            .font_family
            .as_deref()
            .map(str::trim)
            .unwrap_or(DEFAULT_FONT_FAMILY);
        if font_family.is_empty() {
            return Err(invalid("fontFamily must not be empty"));
        }

        let font_size = self.font_size.unwrap_or(DEFAULT_FONT_SIZE);
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(invalid(format!("fontSize must be positive, got {}", font_size)));
        }

        let line_height = self
            .line_height
            .unwrap_or(font_size * DEFAULT_LINE_HEIGHT_FACTOR);
        check_non_negative("lineHeight", line_height)?;

        let letter_spacing = self.letter_spacing.unwrap_or(0.0);
        if !letter_spacing.is_finite() {
            return Err(invalid("letterSpacing must be finite"));
        }

        let padding = self.padding.unwrap_or([0.0, 0.0]);
        check_non_negative("padding[0]", padding[0])?;
        check_non_negative("padding[1]", padding[1])?;

        let region = RegionOverride {
            x: self.x,
            y: self.y,
            width: self.w,
            height: self.h,
        };
        for (name, value) in [("x", region.x), ("y", region.y)] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(invalid(format!("{} must be finite", name)));
            }
        }
        for (name, value) in [("w", region.width), ("h", region.height)] {
            if let Some(value) = value {
                check_non_negative(name, value)?;
            }
        }
        if !bounding_box.is_finite() {
            return Err(invalid("surface bounding box is not finite"));
        }

        Ok(RenderConfig {
            font_family: font_family.to_string(),
            font_size,
            line_height,
            letter_spacing,
            padding,
            auto_size: self.auto_size.unwrap_or(false),
            region,
        })
    }
}

fn invalid(message: impl Into<String>) -> RenderError {
    RenderError::InvalidConfig(message.into())
}

fn check_non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be a non-negative number, got {}", name, value)))
    }
}

/// Caller overrides for the render region; unset edges follow the surface
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegionOverride {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl RegionOverride {
    /// The region for a surface of the given logical size
    pub fn resolve(&self, bounding_box: Size) -> Rect {
        Rect::new(
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.width.unwrap_or(bounding_box.width),
            self.height.unwrap_or(bounding_box.height),
        )
    }
}

/// Validated render settings
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub font_family: String,
    pub font_size: f32,
    pub line_height: f32,
    pub letter_spacing: f32,
    /// `[horizontal, vertical]`
    pub padding: [f32; 2],
    pub auto_size: bool,
    pub region: RegionOverride,
}

impl RenderConfig {
    /// The unstyled font every token's font is derived from
    pub fn base_font(&self) -> FontDescriptor {
        FontDescriptor::new(self.font_size, self.font_family.clone())
    }

    /// Region to fill and draw within, for a surface of the given logical size
    pub fn region(&self, bounding_box: Size) -> Rect {
        self.region.resolve(bounding_box)
    }

    /// Top-left origin of line `index` inside `region`
    pub fn line_origin(&self, region: Rect, index: usize) -> Point {
        Point::new(
            region.x() + self.padding[0],
            region.y() + self.padding[1] + index as f32 * self.line_height,
        )
    }

    /// Logical surface size that fits `line_count` lines of `content_width`
    pub fn content_size(&self, content_width: f32, line_count: usize) -> Size {
        Size::new(
            content_width + self.padding[0] * 2.0,
            self.padding[1] * 2.0 + line_count as f32 * self.line_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BBOX: Size = Size::new(800.0, 600.0);

    #[test]
    fn test_defaults() {
        let config = RenderOptions::default().resolve(BBOX).unwrap();
        assert_eq!(config.font_family, "monospace");
        assert_eq!(config.font_size, 13.0);
        assert_eq!(config.line_height, 19.5);
        assert_eq!(config.letter_spacing, 0.0);
        assert_eq!(config.padding, [0.0, 0.0]);
        assert!(!config.auto_size);
        assert_eq!(config.region(BBOX), Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(config.base_font().to_css(), "13px monospace");
    }

    #[test]
    fn test_line_height_follows_resolved_font_size() {
        let config = RenderOptions::new().with_font_size(20.0).resolve(BBOX).unwrap();
        assert_eq!(config.line_height, 30.0);

        let explicit = RenderOptions::new()
            .with_font_size(20.0)
            .with_line_height(24.0)
            .resolve(BBOX)
            .unwrap();
        assert_eq!(explicit.line_height, 24.0);
    }

    #[test]
    fn test_partial_region_override() {
        let config = RenderOptions::new()
            .with_origin(10.0, 5.0)
            .resolve(BBOX)
            .unwrap();
        assert_eq!(config.region(BBOX), Rect::new(10.0, 5.0, 800.0, 600.0));

        let mut options = RenderOptions::new();
        options.h = Some(100.0);
        let config = options.resolve(BBOX).unwrap();
        assert_eq!(config.region(BBOX), Rect::new(0.0, 0.0, 800.0, 100.0));
    }

    #[test]
    fn test_line_origin_and_content_size() {
        let config = RenderOptions::new()
            .with_padding(10.0, 20.0)
            .with_line_height(18.0)
            .resolve(BBOX)
            .unwrap();
        let region = Rect::new(5.0, 7.0, 100.0, 100.0);
        assert_eq!(config.line_origin(region, 0), Point::new(15.0, 27.0));
        assert_eq!(config.line_origin(region, 3), Point::new(15.0, 81.0));
        assert_eq!(config.content_size(120.0, 3), Size::new(140.0, 94.0));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let bad = [
            RenderOptions::new().with_font_size(0.0),
            RenderOptions::new().with_font_size(f32::NAN),
            RenderOptions::new().with_line_height(-1.0),
            RenderOptions::new().with_letter_spacing(f32::INFINITY),
            RenderOptions::new().with_padding(-1.0, 0.0),
            RenderOptions::new().with_font_family("  "),
            RenderOptions::new().with_region(Rect::new(0.0, 0.0, -5.0, 10.0)),
        ];
        for options in bad {
            let err = options.resolve(BBOX).unwrap_err();
            assert!(matches!(err, RenderError::InvalidConfig(_)), "{:?}", options);
        }
    }

    #[test]
    fn test_negative_letter_spacing_is_allowed() {
        let config = RenderOptions::new()
            .with_letter_spacing(-0.5)
            .resolve(BBOX)
            .unwrap();
        assert_eq!(config.letter_spacing, -0.5);
    }

    #[test]
    fn test_from_json() {
        let options: RenderOptions = serde_json::from_str(
            r#"{"fontFamily": "Menlo", "fontSize": 14, "lineHight": 21, "padding": [8, 4], "autoSize": true}"#,
        )
        .unwrap();
        assert_eq!(options.line_height, Some(21.0));

        let config = options.resolve(BBOX).unwrap();
        assert_eq!(config.font_family, "Menlo");
        assert_eq!(config.padding, [8.0, 4.0]);
        assert!(config.auto_size);
    }

    #[test]
    fn test_from_toml() {
        let options: RenderOptions = toml::from_str(
            r#"
            x = 4.0
            fontSize = 16.0
            letterSpacing = 0.5
            "#,
        )
        .unwrap();
        let config = options.resolve(BBOX).unwrap();
        assert_eq!(config.line_height, 24.0);
        assert_eq!(config.letter_spacing, 0.5);
        assert_eq!(config.region(BBOX).x(), 4.0);
    }

    #[test]
    fn test_serializes_only_set_fields() {
        let json = serde_json::to_string(&RenderOptions::new().with_font_size(12.0)).unwrap();
        assert_eq!(json, r#"{"fontSize":12.0}"#);
    }
}
