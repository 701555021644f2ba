//! Lexical and syntactic tooling for Python source: tokenizing and
//! classifying lexemes, highlighting, function signature extraction,
//! canonical formatting and syntax tree dumps.

// Export modules for library usage
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatter;
pub mod formatting;
pub mod highlight;
pub mod io;
pub mod lexer;
pub mod syntax;

// Re-export commonly used types
pub use crate::core::{ConfigError, Error, FormatError, ParseError, Result};

pub use crate::lexer::{
    classify, classify_all, tokenize, CategoryTables, ClassifiedToken, Lexeme, TokenCategory,
    TokenizeMode, Tokenizer,
};

pub use crate::highlight::{highlight, highlight_with, strip_markers, HighlightTheme, MarkerPair};

pub use crate::syntax::{
    dump, extract_signatures, extract_signatures_with, parse, FunctionSignature, SyntaxTree,
    WalkOrder,
};

pub use crate::formatter::{format, CanonicalFormatter, FormatOptions, Formatter, SourceFormatter};

pub use crate::analysis::{analyze_source, AnalysisReport, Pipeline};

pub use crate::config::PylensConfig;
