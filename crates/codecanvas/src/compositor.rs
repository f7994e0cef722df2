//! Theme background compositing

use codecanvas_core::{Color, Rect};
use codecanvas_paint::DrawingContext;

use crate::error::{RenderError, Result};
use crate::highlight::ThemeResolver;

/// Resolve and parse a theme's background color
pub async fn resolve_background<R: ThemeResolver>(themes: &R, theme: &str) -> Result<Color> {
    let value = themes
        .background(theme)
        .await
        .map_err(|e| RenderError::Theme {
            theme: theme.to_string(),
            source: Box::new(e),
        })?;

    Color::parse(&value).ok_or_else(|| RenderError::InvalidColor {
        theme: theme.to_string(),
        value,
    })
}

/// Fill `region` with the background; must run before any text is drawn
pub fn fill_background<C: DrawingContext>(ctx: &mut C, region: Rect, background: Color) {
    tracing::debug!(
        "Filling background {:?} over ({}, {}, {}, {})",
        background.to_rgba8(),
        region.x(),
        region.y(),
        region.width(),
        region.height()
    );
    ctx.set_fill_style(background);
    ctx.fill_rect(region);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::ThemeTable;
    use codecanvas_paint::{DrawCommand, RecordingContext};

    #[tokio::test]
    async fn test_resolve_background() {
        let themes = ThemeTable::new()
            .with_theme("dark", "#1e1e1e")
            .with_theme("broken", "bluish");

        assert_eq!(
            resolve_background(&themes, "dark").await.unwrap(),
            Color::from_hex(0x1e1e1e)
        );
        assert!(matches!(
            resolve_background(&themes, "broken").await,
            Err(RenderError::InvalidColor { value, .. }) if value == "bluish"
        ));
        assert!(matches!(
            resolve_background(&themes, "nope").await,
            Err(RenderError::Theme { theme, .. }) if theme == "nope"
        ));
    }

    #[test]
    fn test_fill_background_covers_region() {
        let mut ctx = RecordingContext::new();
        let region = Rect::new(4.0, 8.0, 120.0, 60.0);
        fill_background(&mut ctx, region, Color::BLUE);

        assert_eq!(
            ctx.commands(),
            &[
                DrawCommand::SetFillStyle(Color::BLUE),
                DrawCommand::FillRect {
                    rect: region,
                    color: Color::BLUE
                },
            ]
        );
    }
}
