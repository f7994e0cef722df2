//! Recording backend
//!
//! Records every state change and fill as a [`DrawCommand`]. Text is
//! measured with [`EstimatedTextMeasurer`] unless another [`TextMeasurer`]
//! is supplied, so output is independent of the fonts installed on the
//! machine.

use std::fmt;
use std::sync::Arc;

use codecanvas_core::{Affine2D, Color, Point, Rect, Size, TextBaseline};
use codecanvas_text::{EstimatedTextMeasurer, FontDescriptor, TextMeasurer, TextMetrics};

use crate::context::{physical_size, ContextState, DrawingContext, Surface};
use crate::error::Result;

/// A recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Scale { sx: f32, sy: f32 },
    SetTextBaseline(TextBaseline),
    SetFont(FontDescriptor),
    SetLetterSpacing(f32),
    SetFillStyle(Color),
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillText {
        text: String,
        origin: Point,
        font: FontDescriptor,
        color: Color,
    },
}

/// A drawing context that records commands for later inspection or replay
pub struct RecordingContext {
    state: ContextState,
    commands: Vec<DrawCommand>,
    measurer: Arc<dyn TextMeasurer>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::with_measurer(Arc::new(EstimatedTextMeasurer))
    }

    /// A context whose `measure_text` is answered by `measurer`
    pub fn with_measurer(measurer: Arc<dyn TextMeasurer>) -> Self {
        Self {
            state: ContextState::default(),
            commands: Vec::new(),
            measurer,
        }
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop all commands and reset the drawing state
    pub fn reset(&mut self) {
        self.commands.clear();
        self.state = ContextState::default();
    }

    pub fn state(&self) -> &ContextState {
        &self.state
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingContext")
            .field("state", &self.state)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

impl DrawingContext for RecordingContext {
    fn scale(&mut self, sx: f32, sy: f32) {
        self.commands.push(DrawCommand::Scale { sx, sy });
        self.state.scale(sx, sy);
    }

    fn current_transform(&self) -> Affine2D {
        self.state.transform
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.commands.push(DrawCommand::SetTextBaseline(baseline));
        self.state.text_baseline = baseline;
    }

    fn text_baseline(&self) -> TextBaseline {
        self.state.text_baseline
    }

    fn set_font(&mut self, font: &FontDescriptor) {
        self.commands.push(DrawCommand::SetFont(font.clone()));
        self.state.font = font.clone();
    }

    fn font(&self) -> &FontDescriptor {
        &self.state.font
    }

    fn set_letter_spacing(&mut self, spacing: f32) {
        self.commands.push(DrawCommand::SetLetterSpacing(spacing));
        self.state.letter_spacing = spacing;
    }

    fn letter_spacing(&self) -> f32 {
        self.state.letter_spacing
    }

    fn set_fill_style(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetFillStyle(color));
        self.state.fill_style = color;
    }

    fn fill_style(&self) -> Color {
        self.state.fill_style
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: self.state.fill_style,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            origin,
            font: self.state.font.clone(),
            color: self.state.fill_style,
        });
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        self.measurer
            .measure(text, &self.state.font, self.state.letter_spacing)
    }
}

/// An in-memory surface backed by a [`RecordingContext`]
#[derive(Debug)]
pub struct RecordingSurface {
    display_size: Size,
    device_pixel_ratio: f32,
    backing_size: (u32, u32),
    context: RecordingContext,
    attached: bool,
}

impl RecordingSurface {
    /// A surface displayed at `display_size` logical pixels
    pub fn new(display_size: Size, device_pixel_ratio: f32) -> Self {
        Self {
            display_size,
            device_pixel_ratio,
            backing_size: physical_size(display_size, device_pixel_ratio),
            context: RecordingContext::new(),
            attached: true,
        }
    }

    /// A surface that never yields a drawing context
    pub fn detached(display_size: Size, device_pixel_ratio: f32) -> Self {
        Self {
            attached: false,
            ..Self::new(display_size, device_pixel_ratio)
        }
    }

    /// The recording context, whether or not the surface is attached
    pub fn recording(&self) -> &RecordingContext {
        &self.context
    }

    pub fn commands(&self) -> &[DrawCommand] {
        self.context.commands()
    }
}

impl Surface for RecordingSurface {
    type Context = RecordingContext;

    fn bounding_box(&self) -> Size {
        self.display_size
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing_size
    }

    fn set_backing_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.backing_size = (width, height);
        self.context.reset();
        Ok(())
    }

    fn set_display_size(&mut self, size: Size) {
        self.display_size = size;
    }

    fn context(&mut self) -> Option<&mut RecordingContext> {
        self.attached.then_some(&mut self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_state_and_fills() {
        let mut ctx = RecordingContext::new();
        ctx.set_fill_style(Color::RED);
        ctx.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        ctx.fill_text("hi", Point::new(1.0, 2.0));

        assert_eq!(ctx.commands().len(), 3);
        assert_eq!(
            ctx.commands()[2],
            DrawCommand::FillText {
                text: "hi".to_string(),
                origin: Point::new(1.0, 2.0),
                font: FontDescriptor::new(10.0, "sans-serif"),
                color: Color::RED,
            }
        );
    }

    #[test]
    fn test_measure_uses_current_font_and_spacing() {
        let mut ctx = RecordingContext::new();
        ctx.set_font(&FontDescriptor::new(10.0, "monospace"));
        let plain = ctx.measure_text("abc").width;
        assert!((plain - 18.0).abs() < 1e-4);

        ctx.set_letter_spacing(1.0);
        assert!((ctx.measure_text("abc").width - plain - 3.0).abs() < 1e-4);
        // Measurement is not a draw
        assert_eq!(ctx.commands().len(), 2);
    }

    #[test]
    fn test_custom_measurer() {
        struct Fixed;
        impl TextMeasurer for Fixed {
            fn measure(&self, text: &str, _: &FontDescriptor, spacing: f32) -> TextMetrics {
                let width = text.len() as f32 * (4.0 + spacing);
                TextMetrics {
                    width,
                    actual_bounding_box_right: width,
                    ..Default::default()
                }
            }
        }

        let mut ctx = RecordingContext::with_measurer(Arc::new(Fixed));
        assert_eq!(ctx.measure_text("abc").width, 12.0);
        ctx.set_letter_spacing(-1.0);
        assert_eq!(ctx.measure_text("abc").rendered_width(), 9.0);
    }

    #[test]
    fn test_resize_resets_context() {
        let mut surface = RecordingSurface::new(Size::new(100.0, 50.0), 2.0);
        assert_eq!(surface.backing_size(), (200, 100));

        let ctx = surface.context().unwrap();
        ctx.scale(2.0, 2.0);
        ctx.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));

        surface.set_backing_size(300, 120).unwrap();
        assert_eq!(surface.backing_size(), (300, 120));
        assert!(surface.commands().is_empty());
        assert_eq!(surface.recording().state(), &ContextState::default());
    }

    #[test]
    fn test_detached_surface_has_no_context() {
        let mut surface = RecordingSurface::detached(Size::new(100.0, 50.0), 1.0);
        assert!(surface.context().is_none());
        assert_eq!(surface.bounding_box(), Size::new(100.0, 50.0));
    }

    #[test]
    fn test_usable_as_generic_surface() {
        fn paint<S: Surface>(surface: &mut S) -> bool {
            match surface.context() {
                Some(ctx) => {
                    ctx.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0));
                    true
                }
                None => false,
            }
        }

        let mut surface = RecordingSurface::new(Size::new(10.0, 10.0), 1.0);
        assert!(paint(&mut surface));
        assert_eq!(surface.commands().len(), 1);
    }
}
