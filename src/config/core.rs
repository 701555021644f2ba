use serde::{Deserialize, Serialize};

use crate::core::ConfigError;
use crate::formatter::FormatOptions;
use crate::highlight::{HighlightTheme, MarkerPair, ThemePreset};
use crate::lexer::{CategoryTables, TokenCategory, TokenizeMode, Tokenizer};
use crate::syntax::WalkOrder;

/// Root configuration structure for pylens
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PylensConfig {
    /// Category table overrides
    #[serde(default)]
    pub tables: Option<TablesConfig>,

    /// Tokenizer settings
    #[serde(default)]
    pub tokenizer: Option<TokenizerConfig>,

    /// Highlight theme
    #[serde(default)]
    pub theme: Option<ThemeConfig>,

    /// Formatter layout options
    #[serde(default)]
    pub formatter: Option<FormatOptions>,

    /// Syntax tree traversal and dump settings
    #[serde(default)]
    pub syntax: Option<SyntaxConfig>,
}

impl PylensConfig {
    /// Category tables, with each configured list replacing its default.
    pub fn category_tables(&self) -> CategoryTables {
        match &self.tables {
            Some(tables) => tables.build(),
            None => CategoryTables::default(),
        }
    }

    pub fn tokenize_mode(&self) -> TokenizeMode {
        self.tokenizer
            .as_ref()
            .map(|t| t.mode)
            .unwrap_or_default()
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(self.tokenize_mode(), &self.category_tables())
    }

    pub fn theme(&self) -> HighlightTheme {
        self.theme
            .as_ref()
            .map_or_else(HighlightTheme::ansi, ThemeConfig::build)
    }

    pub fn format_options(&self) -> FormatOptions {
        self.formatter.unwrap_or_default()
    }

    pub fn walk_order(&self) -> WalkOrder {
        self.syntax
            .as_ref()
            .map(|s| s.walk_order)
            .unwrap_or_default()
    }

    pub fn dump_indent(&self) -> usize {
        self.syntax
            .as_ref()
            .map_or_else(default_dump_indent, |s| s.dump_indent)
    }

    /// Reject settings no component can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(formatter) = &self.formatter {
            if formatter.indent_width == 0 {
                return Err(ConfigError::Invalid(
                    "formatter.indent_width must be at least 1".into(),
                ));
            }
        }
        if let Some(tables) = &self.tables {
            tables.validate()?;
        }
        if let Some(theme) = &self.theme {
            theme.validate()?;
        }
        Ok(())
    }
}

/// Replacement word lists for the category tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TablesConfig {
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub datatypes: Option<Vec<String>>,
    #[serde(default)]
    pub operators: Option<Vec<String>>,
    #[serde(default)]
    pub brackets: Option<Vec<String>>,
}

impl TablesConfig {
    pub fn build(&self) -> CategoryTables {
        let defaults = CategoryTables::default();
        let pick = |configured: &Option<Vec<String>>, category| -> Vec<String> {
            configured
                .clone()
                .unwrap_or_else(|| defaults.entries(category).to_vec())
        };
        CategoryTables::new(
            pick(&self.keywords, TokenCategory::Keyword),
            pick(&self.datatypes, TokenCategory::DataType),
            pick(&self.operators, TokenCategory::Operator),
            pick(&self.brackets, TokenCategory::Bracket),
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let lists = [
            ("keywords", &self.keywords),
            ("datatypes", &self.datatypes),
            ("operators", &self.operators),
            ("brackets", &self.brackets),
        ];
        for (name, list) in lists {
            let Some(entries) = list else { continue };
            if entries.iter().any(|e| e.is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "tables.{name} contains an empty entry"
                )));
            }
            if entries.iter().any(|e| e.chars().any(char::is_whitespace)) {
                return Err(ConfigError::Invalid(format!(
                    "tables.{name} entries cannot contain whitespace"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenizerConfig {
    #[serde(default)]
    pub mode: TokenizeMode,
}

/// Theme preset plus optional per-category marker overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeConfig {
    #[serde(default)]
    pub preset: ThemePreset,
    #[serde(default)]
    pub keyword: Option<MarkerPair>,
    #[serde(default)]
    pub datatype: Option<MarkerPair>,
    #[serde(default)]
    pub operator: Option<MarkerPair>,
    #[serde(default)]
    pub bracket: Option<MarkerPair>,
}

impl ThemeConfig {
    pub fn build(&self) -> HighlightTheme {
        self.overrides()
            .fold(HighlightTheme::from_preset(self.preset), |theme, (category, pair)| {
                theme.with(category, pair.clone())
            })
    }

    fn overrides(&self) -> impl Iterator<Item = (TokenCategory, &MarkerPair)> {
        [
            (TokenCategory::Keyword, &self.keyword),
            (TokenCategory::DataType, &self.datatype),
            (TokenCategory::Operator, &self.operator),
            (TokenCategory::Bracket, &self.bracket),
        ]
        .into_iter()
        .filter_map(|(category, pair)| pair.as_ref().map(|p| (category, p)))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (category, pair) in self.overrides() {
            if pair.begin.is_empty() != pair.end.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "theme.{category} needs both begin and end markers, or neither"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyntaxConfig {
    #[serde(default)]
    pub walk_order: WalkOrder,
    #[serde(default = "default_dump_indent")]
    pub dump_indent: usize,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            walk_order: WalkOrder::default(),
            dump_indent: default_dump_indent(),
        }
    }
}

pub fn default_dump_indent() -> usize {
    4
}
