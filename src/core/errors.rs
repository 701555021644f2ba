//! Shared error types for the library

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Source text is not valid Python according to the parser.
///
/// Line and column are 1-based and refer to the normalized (dedented and
/// trimmed) text that was handed to the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn at(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(
                f,
                "syntax error at line {line}, column {column}: {}",
                self.message
            ),
            (Some(line), None) => write!(f, "syntax error at line {line}: {}", self.message),
            _ => write!(f, "syntax error: {}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// The formatter could not produce canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatError {
    /// Input rejected before formatting
    #[error("cannot format invalid source: {0}")]
    Syntax(#[source] ParseError),

    /// The formatting collaborator failed on its own
    #[error("formatter '{name}' failed: {message}")]
    Collaborator { name: String, message: String },

    /// Formatted output no longer parses
    #[error("formatted output is not valid source: {0}")]
    Unparseable(#[source] ParseError),

    /// A second pass changed the output
    #[error("formatter '{name}' is not idempotent (first difference at line {line})")]
    NotIdempotent { name: String, line: usize },
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main error type for pylens operations
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
