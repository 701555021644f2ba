//! One-shot analysis of a source snippet.
//!
//! A [`Pipeline`] is assembled once from configuration and then used
//! read-only. [`analyze_source`] runs every stage; highlighting never fails,
//! while the tree-based stages are skipped when the source does not parse.

use serde::Serialize;
use tracing::{debug, info_span};

use crate::config::PylensConfig;
use crate::core::{FormatError, ParseError, Result};
use crate::formatter::Formatter;
use crate::highlight::{highlight_with, HighlightTheme};
use crate::lexer::{classify_all, CategoryTables, ClassifiedToken, TokenCategory, Tokenizer};
use crate::syntax::{self, dump, extract_signatures_with, FunctionSignature, SyntaxTree, WalkOrder};

#[derive(Debug, Clone)]
pub struct Pipeline {
    tables: CategoryTables,
    tokenizer: Tokenizer,
    theme: HighlightTheme,
    formatter: Formatter,
    walk_order: WalkOrder,
    dump_indent: usize,
}

impl Pipeline {
    pub fn new(config: &PylensConfig) -> Self {
        let tables = config.category_tables();
        Self {
            tokenizer: Tokenizer::new(config.tokenize_mode(), &tables),
            tables,
            theme: config.theme(),
            formatter: Formatter::new(config.format_options()),
            walk_order: config.walk_order(),
            dump_indent: config.dump_indent(),
        }
    }

    pub fn with_theme(mut self, theme: HighlightTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_walk_order(mut self, order: WalkOrder) -> Self {
        self.walk_order = order;
        self
    }

    pub fn with_dump_indent(mut self, indent: usize) -> Self {
        self.dump_indent = indent;
        self
    }

    pub fn tokens<'s>(&self, source: &'s str) -> Vec<ClassifiedToken<'s>> {
        classify_all(&self.tokenizer.tokenize(source), &self.tables)
    }

    pub fn highlight(&self, source: &str) -> String {
        highlight_with(&self.tokenizer, source, &self.tables, &self.theme)
    }

    pub fn signatures(&self, tree: &SyntaxTree) -> Vec<FunctionSignature> {
        extract_signatures_with(tree, self.walk_order)
    }

    pub fn format(&self, source: &str) -> std::result::Result<String, FormatError> {
        self.formatter.format(source)
    }

    pub fn dump(&self, tree: &SyntaxTree) -> String {
        dump(tree, self.dump_indent)
    }

    /// Parse `source` and extract its signatures.
    pub fn signatures_of(&self, source: &str) -> Result<Vec<FunctionSignature>> {
        let tree = syntax::parse(source)?;
        Ok(self.signatures(&tree))
    }

    /// Parse `source` and dump its tree.
    pub fn dump_of(&self, source: &str) -> Result<String> {
        let tree = syntax::parse(source)?;
        Ok(self.dump(&tree))
    }

    /// Canonical text of `source`, or `None` when it is already canonical.
    pub fn reformat(&self, source: &str) -> Result<Option<String>> {
        let formatted = self.format(source)?;
        Ok((formatted != source).then_some(formatted))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&PylensConfig::default())
    }
}

/// Owned copy of a classified lexeme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRecord {
    pub text: String,
    pub category: TokenCategory,
    pub start: usize,
    pub end: usize,
}

impl From<&ClassifiedToken<'_>> for TokenRecord {
    fn from(token: &ClassifiedToken<'_>) -> Self {
        Self {
            text: token.lexeme.text.to_string(),
            category: token.category,
            start: token.lexeme.start,
            end: token.lexeme.end,
        }
    }
}

/// Every output for one snippet.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub tokens: Vec<TokenRecord>,
    pub highlighted: String,
    pub signatures: Vec<FunctionSignature>,
    pub formatted: Option<String>,
    pub tree: Option<String>,
    pub parse_error: Option<ParseError>,
    pub format_error: Option<FormatError>,
}

impl AnalysisReport {
    pub fn is_valid(&self) -> bool {
        self.parse_error.is_none()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn analyze_source(source: &str, pipeline: &Pipeline) -> AnalysisReport {
    let _span = info_span!("analyze", bytes = source.len()).entered();

    let tokens = pipeline.tokens(source).iter().map(TokenRecord::from).collect();
    let highlighted = pipeline.highlight(source);

    let tree = match syntax::parse(source) {
        Ok(tree) => tree,
        Err(parse_error) => {
            debug!(error = %parse_error, "skipping tree stages");
            return AnalysisReport {
                tokens,
                highlighted,
                signatures: Vec::new(),
                formatted: None,
                tree: None,
                parse_error: Some(parse_error),
                format_error: None,
            };
        }
    };

    let (formatted, format_error) = match pipeline.format(source) {
        Ok(formatted) => (Some(formatted), None),
        Err(e) => (None, Some(e)),
    };

    AnalysisReport {
        tokens,
        highlighted,
        signatures: pipeline.signatures(&tree),
        formatted,
        tree: Some(pipeline.dump(&tree)),
        parse_error: None,
        format_error,
    }
}
