//! Highlighter collaborators
//!
//! Tokenization and theme lookup are owned by an external highlighting
//! engine. The renderer only depends on these two traits, so the engine is
//! passed in explicitly and tests can substitute in-memory fakes.

use std::future::{ready, Future};

use codecanvas_core::{Document, Token};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Converts source text into highlighted lines
pub trait Tokenizer: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Tokenize `code` written in `lang`, colored by `theme`
    ///
    /// May suspend, e.g. to lazily load a grammar on first use.
    fn tokenize(
        &self,
        code: &str,
        lang: &str,
        theme: &str,
    ) -> impl Future<Output = Result<Document, Self::Error>> + Send;
}

/// Resolves a theme identifier to its background color string
pub trait ThemeResolver: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn background(&self, theme: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Lookup failures of the in-memory collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
}

/// A tokenizer that returns pre-tokenized documents by language
///
/// The source text is ignored; the document registered for the language is
/// returned as-is.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenizer {
    documents: FxHashMap<String, Document>,
}

impl StaticTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, lang: impl Into<String>, document: Document) -> Self {
        self.documents.insert(lang.into(), document);
        self
    }
}

impl Tokenizer for StaticTokenizer {
    type Error = HighlightError;

    fn tokenize(
        &self,
        _code: &str,
        lang: &str,
        _theme: &str,
    ) -> impl Future<Output = Result<Document, HighlightError>> + Send {
        ready(
            self.documents
                .get(lang)
                .cloned()
                .ok_or_else(|| HighlightError::UnknownLanguage(lang.to_string())),
        )
    }
}

/// A tokenizer that emits each source line as a single token
///
/// Empty lines become empty token lists. A `\r` before each `\n` is dropped.
#[derive(Debug, Clone, Default)]
pub struct PlainTokenizer {
    color: Option<String>,
}

impl PlainTokenizer {
    /// Tokens carry `color`; `None` produces uncolored tokens
    pub fn new(color: Option<&str>) -> Self {
        Self {
            color: color.map(str::to_string),
        }
    }

    pub fn tokenize_sync(&self, code: &str) -> Document {
        code.split('\n')
            .map(|line| {
                let line = line.strip_suffix('\r').unwrap_or(line);
                if line.is_empty() {
                    Vec::new()
                } else {
                    vec![Token::new(line, self.color.as_deref())]
                }
            })
            .collect::<Vec<_>>()
            .into()
    }
}

impl Tokenizer for PlainTokenizer {
    type Error = HighlightError;

    fn tokenize(
        &self,
        code: &str,
        _lang: &str,
        _theme: &str,
    ) -> impl Future<Output = Result<Document, HighlightError>> + Send {
        ready(Ok(self.tokenize_sync(code)))
    }
}

/// An in-memory theme table mapping theme ids to background colors
#[derive(Debug, Clone, Default)]
pub struct ThemeTable {
    backgrounds: FxHashMap<String, String>,
}

impl ThemeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(mut self, theme: impl Into<String>, background: impl Into<String>) -> Self {
        self.backgrounds.insert(theme.into(), background.into());
        self
    }
}

impl ThemeResolver for ThemeTable {
    type Error = HighlightError;

    fn background(&self, theme: &str) -> impl Future<Output = Result<String, HighlightError>> + Send {
        ready(
            self.backgrounds
                .get(theme)
                .cloned()
                .ok_or_else(|| HighlightError::UnknownTheme(theme.to_string())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_tokenizer_by_language() {
        let doc = Document::from_lines(vec![vec![Token::new("let", Some("#c678dd"))]]);
        let tokenizer = StaticTokenizer::new().with_language("rust", doc.clone());

        assert_eq!(tokenizer.tokenize("ignored", "rust", "any").await, Ok(doc));
        assert_eq!(
            tokenizer.tokenize("x", "cobol", "any").await,
            Err(HighlightError::UnknownLanguage("cobol".to_string()))
        );
    }

    #[tokio::test]
    async fn test_plain_tokenizer_lines() {
        let doc = PlainTokenizer::new(Some("#ffffff"))
            .tokenize("fn main() {\r\n\n}", "rust", "dark")
            .await
            .unwrap();

        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.lines()[0], vec![Token::new("fn main() {", Some("#ffffff"))]);
        assert!(doc.lines()[1].is_empty());
        assert_eq!(doc.lines()[2][0].content, "}");
    }

    #[test]
    fn test_plain_tokenizer_uncolored() {
        let doc = PlainTokenizer::default().tokenize_sync("a");
        assert_eq!(doc.lines()[0][0].color, None);
    }

    #[tokio::test]
    async fn test_theme_table() {
        let themes = ThemeTable::new().with_theme("nord", "#2e3440");
        assert_eq!(themes.background("nord").await.unwrap(), "#2e3440");
        assert!(matches!(
            themes.background("missing").await,
            Err(HighlightError::UnknownTheme(t)) if t == "missing"
        ));
    }
}
