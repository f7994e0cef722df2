//! Line and token rendering
//!
//! Each line is a fold over its tokens with a horizontal cursor that starts
//! at zero. A token's font is derived from the base font and that token's
//! own style bits, never from whatever font the previous token left active.

use codecanvas_core::{Color, FontStyle, Line, Point, Token};
use codecanvas_paint::DrawingContext;
use codecanvas_text::FontDescriptor;

/// The font a token is drawn in: `base` plus the token's style flags
pub fn effective_font(base: &FontDescriptor, style: FontStyle) -> FontDescriptor {
    FontDescriptor {
        italic: base.italic || style.contains(FontStyle::ITALIC),
        bold: base.bold || style.contains(FontStyle::BOLD),
        underline: base.underline || style.contains(FontStyle::UNDERLINE),
        strikethrough: base.strikethrough || style.contains(FontStyle::STRIKETHROUGH),
        ..base.clone()
    }
}

/// Fill color of a token, or `None` if it is not drawn
pub fn token_color(token: &Token) -> Option<Color> {
    let value = token.color.as_deref()?;
    let color = Color::parse(value);
    if color.is_none() {
        tracing::warn!(
            "Token {:?} has unparseable color {:?}; not drawing it",
            token.content,
            value
        );
    }
    color
}

fn apply_font<C: DrawingContext>(ctx: &mut C, font: &FontDescriptor) {
    if ctx.font() != font {
        ctx.set_font(font);
    }
}

/// Advance for a token under the context's current font
fn advance<C: DrawingContext>(ctx: &mut C, token: &Token) -> f32 {
    ctx.measure_text(&token.content).rendered_width().max(0.0)
}

/// Draw one line with its top-left at `origin`, returning the final cursor
///
/// Uncolored tokens are not drawn but still advance the cursor, so the
/// colored tokens after them stay aligned.
pub fn render_line<C: DrawingContext>(
    ctx: &mut C,
    line: &Line,
    origin: Point,
    base: &FontDescriptor,
) -> f32 {
    let mut cursor = 0.0f32;

    for token in line {
        apply_font(ctx, &effective_font(base, token.font_style));

        if let Some(color) = token_color(token) {
            let at = Point::new(origin.x + cursor, origin.y);
            tracing::trace!("fill_text {:?} at ({}, {})", token.content, at.x, at.y);
            ctx.set_fill_style(color);
            ctx.fill_text(&token.content, at);
        }

        cursor += advance(ctx, token);
    }

    cursor
}

/// Width `render_line` would advance over `line`, without drawing
pub fn measure_line<C: DrawingContext>(ctx: &mut C, line: &Line, base: &FontDescriptor) -> f32 {
    let mut width = 0.0f32;
    for token in line {
        apply_font(ctx, &effective_font(base, token.font_style));
        width += advance(ctx, token);
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use codecanvas_paint::{DrawCommand, RecordingContext};
    use codecanvas_text::{EstimatedTextMeasurer, TextMeasurer, TextMetrics};
    use std::sync::Arc;

    fn base() -> FontDescriptor {
        FontDescriptor::new(13.0, "monospace")
    }

    fn estimate(text: &str, font: &FontDescriptor) -> f32 {
        EstimatedTextMeasurer.measure(text, font, 0.0).rendered_width()
    }

    fn fill_texts(ctx: &RecordingContext) -> Vec<(String, Point, FontDescriptor)> {
        ctx.commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillText {
                    text, origin, font, ..
                } => Some((text.clone(), *origin, font.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_effective_font_is_independent_per_style() {
        let base = base();
        assert_eq!(effective_font(&base, FontStyle::NONE), base);
        assert_eq!(
            effective_font(&base, FontStyle::BOLD).to_css(),
            "bold 13px monospace"
        );
        assert_eq!(
            effective_font(&base, FontStyle::BOLD | FontStyle::ITALIC).to_css(),
            "italic bold 13px monospace"
        );
        assert_eq!(
            effective_font(&base, FontStyle::all()).to_css(),
            "italic bold underline line-through 13px monospace"
        );
        // Unknown bits are ignored
        assert_eq!(effective_font(&base, FontStyle::from_raw(64)), base);
    }

    #[test]
    fn test_styles_do_not_accumulate() {
        let mut ctx = RecordingContext::new();
        let line = vec![
            Token::new("a", Some("#fff")).with_font_style(FontStyle::ITALIC),
            Token::new("b", Some("#fff")).with_font_style(FontStyle::ITALIC),
            Token::new("c", Some("#fff")).with_font_style(FontStyle::BOLD),
            Token::new("d", Some("#fff")),
        ];
        render_line(&mut ctx, &line, Point::ZERO, &base());

        let fonts: Vec<String> = fill_texts(&ctx).into_iter().map(|(_, _, f)| f.to_css()).collect();
        assert_eq!(
            fonts,
            vec![
                "italic 13px monospace",
                "italic 13px monospace",
                "bold 13px monospace",
                "13px monospace",
            ]
        );
    }

    #[test]
    fn test_cursor_advances_by_rendered_width() {
        let mut ctx = RecordingContext::new();
        let italic = Token::new("ab", Some("#fff")).with_font_style(FontStyle::ITALIC);
        let plain = Token::new("cd", Some("#fff"));
        let end = render_line(
            &mut ctx,
            &vec![italic, plain],
            Point::new(5.0, 7.0),
            &base(),
        );

        let italic_width = estimate("ab", &effective_font(&base(), FontStyle::ITALIC));
        // Italic overhang makes the ink box wider than the advance
        assert!(italic_width > EstimatedTextMeasurer.measure("ab", &base(), 0.0).width);

        let texts = fill_texts(&ctx);
        assert_eq!(texts[0].1, Point::new(5.0, 7.0));
        assert_eq!(texts[1].1, Point::new(5.0 + italic_width, 7.0));
        assert_eq!(end, italic_width + estimate("cd", &base()));
    }

    #[test]
    fn test_uncolored_tokens_advance_without_drawing() {
        let mut ctx = RecordingContext::new();
        let line = vec![
            Token::new("let", Some("#c678dd")),
            Token::uncolored("  "),
            Token::new("x", Some("#e06c75")),
        ];
        render_line(&mut ctx, &line, Point::ZERO, &base());

        let texts = fill_texts(&ctx);
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[1].0, "x");
        assert_eq!(
            texts[1].1.x,
            estimate("let", &base()) + estimate("  ", &base())
        );
    }

    #[test]
    fn test_unparseable_color_is_treated_as_uncolored() {
        let mut ctx = RecordingContext::new();
        let line = vec![Token::new("a", Some("not-a-color")), Token::new("b", Some("#000"))];
        render_line(&mut ctx, &line, Point::ZERO, &base());

        let texts = fill_texts(&ctx);
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].1.x, estimate("a", &base()));
    }

    #[test]
    fn test_measure_line_matches_render_cursor() {
        let line = vec![
            Token::new("fn", Some("#569cd6")).with_font_style(FontStyle::BOLD),
            Token::uncolored(" "),
            Token::new("main", Some("#dcdcaa")).with_font_style(FontStyle::ITALIC),
        ];
        let mut ctx = RecordingContext::new();
        let measured = measure_line(&mut ctx, &line, &base());
        let rendered = render_line(&mut ctx, &line, Point::ZERO, &base());
        assert_eq!(measured, rendered);
        assert_eq!(measure_line(&mut ctx, &Vec::new(), &base()), 0.0);
    }

    #[test]
    fn test_redundant_font_changes_are_skipped() {
        let mut ctx = RecordingContext::new();
        ctx.set_font(&base());
        let line = vec![Token::new("a", Some("#fff")), Token::new("b", Some("#fff"))];
        render_line(&mut ctx, &line, Point::ZERO, &base());

        let set_fonts = ctx
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::SetFont(_)))
            .count();
        assert_eq!(set_fonts, 1);
    }

    /// Ink that shrinks with letter spacing, so tight spacing measures negative
    struct Condensed;

    impl TextMeasurer for Condensed {
        fn measure(&self, text: &str, font: &FontDescriptor, spacing: f32) -> TextMetrics {
            let width = text.chars().count() as f32 * (font.size_px * 0.6 + spacing);
            TextMetrics {
                width,
                actual_bounding_box_right: width,
                ..Default::default()
            }
        }
    }

    #[test]
    fn test_negative_letter_spacing_never_moves_cursor_back() {
        let mut ctx = RecordingContext::with_measurer(Arc::new(Condensed));
        ctx.set_letter_spacing(-10.0);
        let line = vec![
            Token::new("ab", Some("#fff")),
            Token::new("c", Some("#fff")).with_font_style(FontStyle::BOLD),
            Token::uncolored(" "),
            Token::new("de", Some("#fff")),
        ];
        assert!(ctx.measure_text("ab").rendered_width() < 0.0);

        let end = render_line(&mut ctx, &line, Point::new(3.0, 0.0), &base());

        let xs: Vec<f32> = fill_texts(&ctx).iter().map(|(_, p, _)| p.x).collect();
        assert_eq!(xs.len(), 3);
        assert!(xs.windows(2).all(|w| w[1] >= w[0]), "{:?}", xs);
        assert!(xs.iter().all(|&x| x >= 3.0));
        assert_eq!(end, 0.0);
        assert_eq!(measure_line(&mut ctx, &line, &base()), 0.0);
    }
}
