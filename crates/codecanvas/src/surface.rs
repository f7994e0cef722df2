//! Surface configuration
//!
//! Sizes the backing store to `logical size * device pixel ratio`, pre-scales
//! the context by the ratio so callers draw in logical units, and installs
//! the base typography (top baseline, base font, letter spacing).

use codecanvas_core::{Document, Rect, Size, TextBaseline};
use codecanvas_paint::{physical_size, DrawingContext, Surface};

use crate::config::RenderConfig;
use crate::error::Result;
use crate::line::measure_line;

/// A configured surface, ready for the compositor and line renderer
pub struct Configured<'a, C> {
    pub context: &'a mut C,
    /// Final logical size of the surface
    pub logical_size: Size,
    /// Region to fill and draw within
    pub region: Rect,
}

fn apply_typography<C: DrawingContext>(ctx: &mut C, config: &RenderConfig) {
    ctx.set_text_baseline(TextBaseline::Top);
    ctx.set_font(&config.base_font());
    ctx.set_letter_spacing(config.letter_spacing);
}

/// Logical size that fits `document` under `config`
///
/// Width is the widest line's advance plus horizontal padding on both
/// sides; height is one line height per line plus vertical padding.
pub fn content_size<C: DrawingContext>(ctx: &mut C, document: &Document, config: &RenderConfig) -> Size {
    let base = config.base_font();
    let width = document
        .lines()
        .iter()
        .map(|line| measure_line(ctx, line, &base))
        .fold(0.0f32, f32::max);
    config.content_size(width, document.line_count())
}

/// Prepare `surface` for drawing `document`
///
/// Returns `Ok(None)` when the surface yields no drawing context; callers
/// treat that as a no-op.
pub fn configure<'a, S: Surface>(
    surface: &'a mut S,
    document: &Document,
    config: &RenderConfig,
) -> Result<Option<Configured<'a, S::Context>>> {
    let ratio = surface.device_pixel_ratio();
    let bounding_box = surface.bounding_box();

    let Some(ctx) = surface.context() else {
        return Ok(None);
    };
    let logical_size = if config.auto_size {
        apply_typography(ctx, config);
        content_size(ctx, document, config)
    } else {
        bounding_box
    };

    let (width, height) = physical_size(logical_size, ratio);
    surface.set_backing_size(width, height)?;
    if config.auto_size {
        surface.set_display_size(logical_size);
    }
    tracing::debug!(
        "Configured surface: logical {}x{}, physical {}x{} at ratio {}",
        logical_size.width,
        logical_size.height,
        width,
        height,
        ratio
    );

    let Some(context) = surface.context() else {
        return Ok(None);
    };
    context.scale(ratio, ratio);
    apply_typography(context, config);

    Ok(Some(Configured {
        context,
        logical_size,
        region: config.region(logical_size),
    }))
}
