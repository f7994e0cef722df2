//! Render a small highlighted snippet onto an offscreen pixmap
//!
//! Run with: cargo run -p codecanvas --example render_demo
//! Set RUST_LOG=codecanvas=debug to see the configured sizes.

use codecanvas::{
    Document, FontStyle, PixmapSurface, RenderOptions, RenderRequest, Renderer, Size,
    StaticTokenizer, Surface, ThemeTable, Token,
};
use tracing_subscriber::EnvFilter;

fn snippet() -> Document {
    Document::from_lines(vec![
        vec![
            Token::new("fn", Some("#569cd6")).with_font_style(FontStyle::BOLD),
            Token::uncolored(" "),
            Token::new("main", Some("#dcdcaa")),
            Token::new("() {", Some("#d4d4d4")),
        ],
        vec![
            Token::uncolored("    "),
            Token::new("// paint me", Some("#6a9955")).with_font_style(FontStyle::ITALIC),
        ],
        vec![
            Token::uncolored("    "),
            Token::new("println!", Some("#dcdcaa")),
            Token::new("(", Some("#d4d4d4")),
            Token::new("\"hello\"", Some("#ce9178")).with_font_style(FontStyle::UNDERLINE),
            Token::new(");", Some("#d4d4d4")),
        ],
        vec![Token::new("}", Some("#d4d4d4"))],
    ])
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let renderer = Renderer::new(
        StaticTokenizer::new().with_language("rust", snippet()),
        ThemeTable::new().with_theme("dark-plus", "#1e1e1e"),
    );

    let mut surface = PixmapSurface::new(Size::new(1.0, 1.0), 2.0)?;
    let request = RenderRequest::new("fn main() {}", "rust", "dark-plus");
    let options = RenderOptions::new()
        .with_font_size(14.0)
        .with_padding(16.0, 12.0)
        .with_auto_size(true);

    renderer.render(&mut surface, &request, &options).await?;

    let logical = surface.bounding_box();
    let (width, height) = surface.backing_size();
    println!(
        "Rendered {} lines: logical {:.1}x{:.1}, physical {}x{}",
        snippet().line_count(),
        logical.width,
        logical.height,
        width,
        height
    );

    let inked = surface
        .raster()
        .to_rgba8()
        .chunks_exact(4)
        .filter(|px| px[..3] != [0x1e, 0x1e, 0x1e])
        .count();
    println!("{} pixels differ from the background", inked);

    Ok(())
}
