//! Drawing context and surface traits
//!
//! The context API follows the HTML canvas 2D model: state setters that
//! persist until changed, rectangle and text fills in the current transform,
//! and text measurement under the current font.

use codecanvas_core::{Affine2D, Color, Point, Rect, Size, TextBaseline};
use codecanvas_text::{FontDescriptor, TextMetrics};

use crate::error::Result;

/// Font a freshly reset context starts with
pub const DEFAULT_CONTEXT_FONT_SIZE: f32 = 10.0;
pub const DEFAULT_CONTEXT_FONT_FAMILY: &str = "sans-serif";

/// A canvas-like drawing context
///
/// Coordinates passed to `fill_rect` and `fill_text` are in user space and
/// go through the current transform.
pub trait DrawingContext {
    /// Post-multiply the current transform by a scale
    fn scale(&mut self, sx: f32, sy: f32);

    fn current_transform(&self) -> Affine2D;

    fn set_text_baseline(&mut self, baseline: TextBaseline);

    fn text_baseline(&self) -> TextBaseline;

    fn set_font(&mut self, font: &FontDescriptor);

    fn font(&self) -> &FontDescriptor;

    /// Extra spacing in px added after every glyph
    fn set_letter_spacing(&mut self, spacing: f32);

    fn letter_spacing(&self) -> f32;

    fn set_fill_style(&mut self, color: Color);

    fn fill_style(&self) -> Color;

    /// Fill a rectangle with the current fill style
    fn fill_rect(&mut self, rect: Rect);

    /// Draw a text run with the current font and fill style
    ///
    /// `origin.y` is interpreted according to the current text baseline.
    fn fill_text(&mut self, text: &str, origin: Point);

    /// Measure a text run with the current font and letter spacing
    fn measure_text(&mut self, text: &str) -> TextMetrics;
}

/// Per-context drawing state, reset when the backing store is resized
#[derive(Debug, Clone, PartialEq)]
pub struct ContextState {
    pub transform: Affine2D,
    pub text_baseline: TextBaseline,
    pub font: FontDescriptor,
    pub letter_spacing: f32,
    pub fill_style: Color,
}

impl Default for ContextState {
    fn default() -> Self {
        Self {
            transform: Affine2D::IDENTITY,
            text_baseline: TextBaseline::Alphabetic,
            font: FontDescriptor::new(DEFAULT_CONTEXT_FONT_SIZE, DEFAULT_CONTEXT_FONT_FAMILY),
            letter_spacing: 0.0,
            fill_style: Color::BLACK,
        }
    }
}

impl ContextState {
    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.transform = self.transform.then(&Affine2D::scale(sx, sy));
    }
}

/// A drawable surface with a logical size and a physical backing store
pub trait Surface {
    type Context: DrawingContext;

    /// Current logical (display) size in CSS pixels
    fn bounding_box(&self) -> Size;

    /// Physical pixels per logical pixel
    fn device_pixel_ratio(&self) -> f32;

    /// Backing store size in physical pixels
    fn backing_size(&self) -> (u32, u32);

    /// Resize the backing store
    ///
    /// Clears its contents and resets the context state, as a canvas does.
    fn set_backing_size(&mut self, width: u32, height: u32) -> Result<()>;

    /// Change the logical (display) size without touching the backing store
    fn set_display_size(&mut self, size: Size);

    /// The drawing context, or `None` when the surface is detached
    fn context(&mut self) -> Option<&mut Self::Context>;
}

/// Physical backing size for a logical size at a pixel ratio
pub fn physical_size(logical: Size, ratio: f32) -> (u32, u32) {
    let scaled = logical.scaled(ratio);
    (
        scaled.width.round().max(0.0) as u32,
        scaled.height.round().max(0.0) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_size() {
        let logical = Size::new(200.0, 100.0);
        assert_eq!(physical_size(logical, 1.0), (200, 100));
        assert_eq!(physical_size(logical, 1.5), (300, 150));
        assert_eq!(physical_size(logical, 2.0), (400, 200));
        assert_eq!(physical_size(logical, 3.0), (600, 300));
        assert_eq!(physical_size(Size::new(10.5, 3.3), 2.0), (21, 7));
    }

    #[test]
    fn test_state_scale_accumulates() {
        let mut state = ContextState::default();
        state.scale(2.0, 2.0);
        state.scale(1.5, 1.5);
        assert_eq!(state.transform.scale_y(), 3.0);
        assert_eq!(
            state.transform.transform_point(Point::new(1.0, 2.0)),
            Point::new(3.0, 6.0)
        );
    }

    #[test]
    fn test_default_state() {
        let state = ContextState::default();
        assert_eq!(state.font.to_css(), "10px sans-serif");
        assert_eq!(state.text_baseline, TextBaseline::Alphabetic);
        assert_eq!(state.fill_style, Color::BLACK);
    }
}
