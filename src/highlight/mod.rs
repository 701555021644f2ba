//! Rendering classified lexemes with per-category markers.
//!
//! A [`HighlightTheme`] maps each category to a begin/end marker pair. The
//! highlighter wraps every lexeme in its category's markers and leaves
//! `Plain` lexemes untouched, so removing the markers yields the input back.

use crate::lexer::{classify, CategoryTables, Tokenizer, TokenCategory};
use serde::{Deserialize, Serialize};

const ANSI_RESET: &str = "\u{1b}[0m";

/// Begin/end markers written around a lexeme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPair {
    #[serde(default)]
    pub begin: String,
    #[serde(default)]
    pub end: String,
}

impl MarkerPair {
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin: begin.into(),
            end: end.into(),
        }
    }
}

/// Built-in themes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreset {
    /// Terminal escape sequences.
    #[default]
    Ansi,
    /// No markers at all.
    Plain,
    /// `<span class="..">` wrappers.
    Html,
}

/// Mapping from category to marker pair. `Plain` always renders neutral.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightTheme {
    keyword: MarkerPair,
    datatype: MarkerPair,
    operator: MarkerPair,
    bracket: MarkerPair,
}

impl HighlightTheme {
    /// Every category neutral.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Bright magenta keywords, blue datatypes, yellow operators and green
    /// brackets, each terminated by a reset.
    pub fn ansi() -> Self {
        Self::plain()
            .with(TokenCategory::Keyword, MarkerPair::new("\u{1b}[95m", ANSI_RESET))
            .with(TokenCategory::DataType, MarkerPair::new("\u{1b}[94m", ANSI_RESET))
            .with(TokenCategory::Operator, MarkerPair::new("\u{1b}[93m", ANSI_RESET))
            .with(TokenCategory::Bracket, MarkerPair::new("\u{1b}[92m", ANSI_RESET))
    }

    pub fn html() -> Self {
        let span = |class: &str| MarkerPair::new(format!("<span class=\"{class}\">"), "</span>");
        Self::plain()
            .with(TokenCategory::Keyword, span("kw"))
            .with(TokenCategory::DataType, span("ty"))
            .with(TokenCategory::Operator, span("op"))
            .with(TokenCategory::Bracket, span("br"))
    }

    pub fn from_preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::Ansi => Self::ansi(),
            ThemePreset::Plain => Self::plain(),
            ThemePreset::Html => Self::html(),
        }
    }

    /// Replace the markers of one category. Setting `Plain` has no effect.
    pub fn with(mut self, category: TokenCategory, markers: MarkerPair) -> Self {
        if let Some(slot) = self.slot_mut(category) {
            *slot = markers;
        }
        self
    }

    pub fn markers(&self, category: TokenCategory) -> Option<&MarkerPair> {
        match category {
            TokenCategory::Keyword => Some(&self.keyword),
            TokenCategory::DataType => Some(&self.datatype),
            TokenCategory::Operator => Some(&self.operator),
            TokenCategory::Bracket => Some(&self.bracket),
            TokenCategory::Plain => None,
        }
    }

    pub fn begin(&self, category: TokenCategory) -> &str {
        self.markers(category).map_or("", |m| m.begin.as_str())
    }

    pub fn end(&self, category: TokenCategory) -> &str {
        self.markers(category).map_or("", |m| m.end.as_str())
    }

    fn slot_mut(&mut self, category: TokenCategory) -> Option<&mut MarkerPair> {
        match category {
            TokenCategory::Keyword => Some(&mut self.keyword),
            TokenCategory::DataType => Some(&mut self.datatype),
            TokenCategory::Operator => Some(&mut self.operator),
            TokenCategory::Bracket => Some(&mut self.bracket),
            TokenCategory::Plain => None,
        }
    }

    /// Distinct non-empty markers, longest first.
    fn marker_strings(&self) -> Vec<&str> {
        let mut markers: Vec<&str> = TokenCategory::PRIORITY
            .iter()
            .filter_map(|c| self.markers(*c))
            .flat_map(|m| [m.begin.as_str(), m.end.as_str()])
            .filter(|m| !m.is_empty())
            .collect();
        markers.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        markers.dedup();
        markers
    }
}

/// Highlight `source` with the default single-character tokenizer.
pub fn highlight(source: &str, tables: &CategoryTables, theme: &HighlightTheme) -> String {
    highlight_with(&Tokenizer::default(), source, tables, theme)
}

pub fn highlight_with(
    tokenizer: &Tokenizer,
    source: &str,
    tables: &CategoryTables,
    theme: &HighlightTheme,
) -> String {
    let mut out = String::with_capacity(source.len() * 2);
    for lexeme in tokenizer.tokenize(source) {
        let category = classify(&lexeme, tables);
        out.push_str(theme.begin(category));
        out.push_str(lexeme.text);
        out.push_str(theme.end(category));
    }
    out
}

/// Remove every marker of `theme` from `highlighted`.
///
/// Exact inverse of [`highlight`] as long as the original text does not
/// itself contain any of the theme's marker strings.
pub fn strip_markers(highlighted: &str, theme: &HighlightTheme) -> String {
    let markers = theme.marker_strings();
    if markers.is_empty() {
        return highlighted.to_string();
    }
    let mut out = String::with_capacity(highlighted.len());
    let mut rest = highlighted;
    'scan: while let Some(c) = rest.chars().next() {
        for marker in &markers {
            if let Some(tail) = rest.strip_prefix(marker) {
                rest = tail;
                continue 'scan;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}
