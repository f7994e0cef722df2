//! Raster backend using tiny-skia
//!
//! Rectangles are filled through tiny-skia in the current transform. Text is
//! shaped with rustybuzz at the logical font size and each glyph is
//! rasterized by swash at the device size, then composited at its
//! device-space pen position.

use std::sync::{Arc, Mutex};

use codecanvas_core::{Affine2D, Color, Point, Rect, Size, TextBaseline};
use codecanvas_text::{
    measure_with_face, FontDescriptor, FontFace, FontRegistry, GlyphRasterizer, RasterizedGlyph,
    TextMetrics, TextShaper,
};
use tiny_skia::{Paint, Pixmap, PixmapPaint, Transform};

use crate::context::{physical_size, ContextState, DrawingContext, Surface};
use crate::error::{PaintError, Result};

fn allocate(width: u32, height: u32) -> Result<Option<Pixmap>> {
    if width == 0 || height == 0 {
        return Ok(None);
    }
    Pixmap::new(width, height)
        .map(Some)
        .ok_or(PaintError::InvalidDimensions { width, height })
}

fn to_skia_transform(transform: Affine2D) -> Transform {
    let [a, b, c, d, tx, ty] = transform.elements;
    Transform::from_row(a, b, c, d, tx, ty)
}

fn solid_paint(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Composite a coverage mask in a solid color with its top-left at (left, top)
fn blit_coverage(target: &mut Pixmap, glyph: &RasterizedGlyph, left: i32, top: i32, color: Color) {
    let Some(mut layer) = Pixmap::new(glyph.width, glyph.height) else {
        return;
    };

    for (pixel, &coverage) in layer.data_mut().chunks_exact_mut(4).zip(&glyph.bitmap) {
        let alpha = color.a * coverage as f32 / 255.0;
        pixel[0] = (color.r * alpha * 255.0).round().clamp(0.0, 255.0) as u8;
        pixel[1] = (color.g * alpha * 255.0).round().clamp(0.0, 255.0) as u8;
        pixel[2] = (color.b * alpha * 255.0).round().clamp(0.0, 255.0) as u8;
        pixel[3] = (alpha * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    target.draw_pixmap(
        left,
        top,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

/// A drawing context that rasterizes into a tiny-skia pixmap
pub struct PixmapContext {
    /// `None` while the backing store has a zero dimension
    pixmap: Option<Pixmap>,
    width: u32,
    height: u32,
    state: ContextState,
    fonts: Arc<Mutex<FontRegistry>>,
    shaper: TextShaper,
    rasterizer: GlyphRasterizer,
}

impl PixmapContext {
    pub fn new(width: u32, height: u32, fonts: Arc<Mutex<FontRegistry>>) -> Result<Self> {
        Ok(Self {
            pixmap: allocate(width, height)?,
            width,
            height,
            state: ContextState::default(),
            fonts,
            shaper: TextShaper::new(),
            rasterizer: GlyphRasterizer::new(),
        })
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Reallocate the backing store, clearing pixels and state
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.pixmap = allocate(width, height)?;
        self.width = width;
        self.height = height;
        self.state = ContextState::default();
        Ok(())
    }

    /// Pixel at physical coordinates, unpremultiplied
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        // tiny-skia only bounds-checks the linear index
        if x >= self.width || y >= self.height {
            return None;
        }
        let pixel = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Color::rgba8(
            pixel.red(),
            pixel.green(),
            pixel.blue(),
            pixel.alpha(),
        ))
    }

    /// Straight-alpha RGBA8 copy of the backing store
    pub fn to_rgba8(&self) -> Vec<u8> {
        let Some(pixmap) = &self.pixmap else {
            return Vec::new();
        };
        pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    fn resolve_face(&self) -> Option<Arc<FontFace>> {
        let mut fonts = match self.fonts.lock() {
            Ok(fonts) => fonts,
            Err(poisoned) => poisoned.into_inner(),
        };
        match fonts.resolve(&self.state.font) {
            Ok(face) => Some(face),
            Err(e) => {
                tracing::warn!("No face for font '{}': {}", self.state.font, e);
                None
            }
        }
    }

    /// Baseline y in user space for a text origin under the current baseline mode
    fn baseline_y(&self, face: &FontFace, y: f32) -> f32 {
        let size = self.state.font.size_px;
        let ascent = face.metrics().ascender_px(size);
        let descent = -face.metrics().descender_px(size);
        match self.state.text_baseline {
            TextBaseline::Top => y + ascent,
            TextBaseline::Middle => y + (ascent - descent) / 2.0,
            TextBaseline::Alphabetic => y,
            TextBaseline::Bottom => y - descent,
        }
    }

    /// Whether bold text in `face` needs synthetic emboldening
    fn needs_embolden(&self, face: &FontFace) -> bool {
        self.state.font.bold && !face.is_bold()
    }

    fn fill_decoration(&mut self, x: f32, y: f32, width: f32, thickness: f32) {
        if width > 0.0 {
            self.fill_rect(Rect::new(x, y - thickness / 2.0, width, thickness));
        }
    }
}

impl DrawingContext for PixmapContext {
    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.scale(sx, sy);
    }

    fn current_transform(&self) -> Affine2D {
        self.state.transform
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
    }

    fn text_baseline(&self) -> TextBaseline {
        self.state.text_baseline
    }

    fn set_font(&mut self, font: &FontDescriptor) {
        self.state.font = font.clone();
    }

    fn font(&self) -> &FontDescriptor {
        &self.state.font
    }

    fn set_letter_spacing(&mut self, spacing: f32) {
        self.state.letter_spacing = spacing;
    }

    fn letter_spacing(&self) -> f32 {
        self.state.letter_spacing
    }

    fn set_fill_style(&mut self, color: Color) {
        self.state.fill_style = color;
    }

    fn fill_style(&self) -> Color {
        self.state.fill_style
    }

    fn fill_rect(&mut self, rect: Rect) {
        let transform = to_skia_transform(self.state.transform);
        let paint = solid_paint(self.state.fill_style);
        let (Some(pixmap), Some(rect)) = (
            self.pixmap.as_mut(),
            tiny_skia::Rect::from_xywh(rect.x(), rect.y(), rect.width(), rect.height()),
        ) else {
            return;
        };
        pixmap.fill_rect(rect, &paint, transform, None);
    }

    fn fill_text(&mut self, text: &str, origin: Point) {
        if self.pixmap.is_none() || text.is_empty() {
            return;
        }
        let Some(face) = self.resolve_face() else {
            return;
        };

        let font = self.state.font.clone();
        let transform = self.state.transform;
        let color = self.state.fill_style;
        let spacing = self.state.letter_spacing;
        let baseline = self.baseline_y(&face, origin.y);
        let device_size = font.size_px * transform.scale_y();
        let embolden = self.needs_embolden(&face);

        let shaped = self.shaper.shape(text, &face, font.size_px);
        for (pen, glyph) in shaped.pen_positions(spacing) {
            let x = origin.x + pen + glyph.x_offset;
            let y = baseline - glyph.y_offset;

            let raster = match self
                .rasterizer
                .rasterize(&face, glyph.glyph_id, device_size, embolden)
            {
                Ok(raster) if !raster.is_empty() => raster,
                Ok(_) => continue,
                Err(e) => {
                    tracing::trace!("Skipping glyph {}: {}", glyph.glyph_id, e);
                    continue;
                }
            };

            let device = transform.transform_point(Point::new(x, y));
            let left = device.x.round() as i32 + raster.bearing_x;
            let top = device.y.round() as i32 - raster.bearing_y;
            if let Some(pixmap) = self.pixmap.as_mut() {
                blit_coverage(pixmap, &raster, left, top, color);
            }
        }

        let run_width = shaped.advance() + spacing * shaped.glyphs.len() as f32;
        let metrics = *face.metrics();
        if font.underline {
            let (offset, thickness) = metrics.underline_px(font.size_px);
            self.fill_decoration(origin.x, baseline + offset, run_width, thickness);
        }
        if font.strikethrough {
            let (offset, thickness) = metrics.strikeout_px(font.size_px);
            self.fill_decoration(origin.x, baseline - offset, run_width, thickness);
        }
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        match self.resolve_face() {
            Some(face) => measure_with_face(
                &face,
                &self.shaper,
                text,
                self.state.font.size_px,
                self.state.letter_spacing,
                self.needs_embolden(&face),
            ),
            None => TextMetrics::default(),
        }
    }
}

/// An offscreen raster surface
pub struct PixmapSurface {
    display_size: Size,
    device_pixel_ratio: f32,
    context: PixmapContext,
}

impl PixmapSurface {
    /// A surface using a fresh system font registry
    pub fn new(display_size: Size, device_pixel_ratio: f32) -> Result<Self> {
        Self::with_fonts(
            display_size,
            device_pixel_ratio,
            Arc::new(Mutex::new(FontRegistry::new())),
        )
    }

    /// A surface sharing an existing font registry
    pub fn with_fonts(
        display_size: Size,
        device_pixel_ratio: f32,
        fonts: Arc<Mutex<FontRegistry>>,
    ) -> Result<Self> {
        let (width, height) = physical_size(display_size, device_pixel_ratio);
        Ok(Self {
            display_size,
            device_pixel_ratio,
            context: PixmapContext::new(width, height, fonts)?,
        })
    }

    pub fn raster(&self) -> &PixmapContext {
        &self.context
    }
}

impl Surface for PixmapSurface {
    type Context = PixmapContext;

    fn bounding_box(&self) -> Size {
        self.display_size
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    fn backing_size(&self) -> (u32, u32) {
        self.context.size()
    }

    fn set_backing_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.context.resize(width, height)
    }

    fn set_display_size(&mut self, size: Size) {
        self.display_size = size;
    }

    fn context(&mut self) -> Option<&mut PixmapContext> {
        Some(&mut self.context)
    }
}
