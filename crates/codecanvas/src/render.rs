//! The render pipeline
//!
//! `Renderer::render` awaits tokenization and the theme background first,
//! then configures the surface, fills the region and draws every line
//! synchronously. Nothing touches the surface until both lookups succeed.

use codecanvas_core::{Color, Document};
use codecanvas_paint::Surface;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use tracing::Instrument;

use crate::compositor::{fill_background, resolve_background};
use crate::config::{RenderConfig, RenderOptions};
use crate::error::{RenderError, Result};
use crate::highlight::{ThemeResolver, Tokenizer};
use crate::line::render_line;
use crate::surface::configure;

/// What to render: source text, its language and the theme to color it with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub code: String,
    pub lang: String,
    pub theme: String,
}

impl RenderRequest {
    pub fn new(code: impl Into<String>, lang: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            lang: lang.into(),
            theme: theme.into(),
        }
    }
}

/// Draw an already tokenized document onto `surface`
///
/// Returns `Ok(false)` if the surface has no drawing context.
pub fn paint_document<S: Surface>(
    surface: &mut S,
    document: &Document,
    config: &RenderConfig,
    background: Color,
) -> Result<bool> {
    let Some(configured) = configure(surface, document, config)? else {
        return Ok(false);
    };
    let ctx = configured.context;
    let region = configured.region;

    fill_background(ctx, region, background);

    let base = config.base_font();
    for (index, line) in document.lines().iter().enumerate() {
        render_line(ctx, line, config.line_origin(region, index), &base);
    }

    Ok(true)
}

/// Renders highlighted code using an injected tokenizer and theme resolver
#[derive(Debug, Clone, Default)]
pub struct Renderer<T, R> {
    tokenizer: T,
    themes: R,
}

impl<T: Tokenizer, R: ThemeResolver> Renderer<T, R> {
    pub fn new(tokenizer: T, themes: R) -> Self {
        Self { tokenizer, themes }
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn themes(&self) -> &R {
        &self.themes
    }

    /// Render `request` onto `surface`
    ///
    /// A detached surface is a silent no-op. Tokenizer and theme failures
    /// are returned before anything is drawn.
    pub async fn render<S: Surface>(
        &self,
        surface: &mut S,
        request: &RenderRequest,
        options: &RenderOptions,
    ) -> Result<()> {
        let span = tracing::debug_span!(
            "render",
            lang = %request.lang,
            theme = %request.theme
        );

        async {
            let config = options.resolve(surface.bounding_box())?;

            let document = self
                .tokenizer
                .tokenize(&request.code, &request.lang, &request.theme)
                .await
                .map_err(|e| RenderError::Tokenize {
                    lang: request.lang.clone(),
                    source: Box::new(e),
                })?;
            let background = resolve_background(&self.themes, &request.theme).await?;
            tracing::debug!("Tokenized {} lines", document.line_count());

            if !paint_document(surface, &document, &config, background)? {
                tracing::warn!("Surface has no drawing context; skipping render");
            }
            Ok::<(), RenderError>(())
        }
        .instrument(span)
        .await
    }

    /// Render onto a shared surface, waiting for earlier renders to finish
    pub async fn render_locked<S: Surface>(
        &self,
        surface: &SurfaceLock<S>,
        request: &RenderRequest,
        options: &RenderOptions,
    ) -> Result<()> {
        let mut guard = surface.lock().await;
        self.render(&mut *guard, request, options).await
    }
}

/// A surface shared between tasks
///
/// Each render holds the lock from configuration to the last line, so
/// renders against the same surface run one at a time in arrival order.
/// Distinct locks are independent.
#[derive(Debug, Default)]
pub struct SurfaceLock<S> {
    inner: Mutex<S>,
}

impl<S> SurfaceLock<S> {
    pub fn new(surface: S) -> Self {
        Self {
            inner: Mutex::new(surface),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, S> {
        self.inner.lock().await
    }

    pub fn into_inner(self) -> S {
        self.inner.into_inner()
    }
}
