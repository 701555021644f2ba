//! Lossless lexical splitting of source text.
//!
//! The tokenizer cuts text at every word/non-word boundary: maximal runs of
//! word characters (alphanumeric in the Unicode sense, or `_`) become one
//! lexeme and every other character becomes a lexeme of its own. Nothing is dropped, so the lexemes
//! of an input always concatenate back to that input.
//!
//! Splitting one non-word character at a time means `<=` arrives as `<` and
//! `=`. [`TokenizeMode::Greedy`] lifts that limitation by matching the longest
//! symbolic operator from the operator table before falling back to a single
//! character.

pub mod classifier;
pub mod tables;

pub use classifier::{classify, classify_all, ClassifiedToken};
pub use tables::{CategoryTables, TokenCategory};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Word runs use the same class as [`is_word_char`]. The regex `\w` differs:
/// it admits combining marks and connector punctuation but not `²`.
static WORD_OR_SINGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{Alphabetic}\p{N}_]+|[^\p{Alphabetic}\p{N}_]")
        .expect("lexeme pattern is a valid regex")
});

/// A contiguous slice of the input produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lexeme<'s> {
    pub text: &'s str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl<'s> Lexeme<'s> {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_word(&self) -> bool {
        self.text.chars().next().is_some_and(is_word_char)
    }
}

/// How non-word characters are grouped into lexemes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TokenizeMode {
    /// One lexeme per non-word character.
    #[default]
    Single,
    /// Longest matching symbolic operator first, then one character.
    Greedy,
}

/// Splits text into lexemes according to a [`TokenizeMode`].
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    mode: TokenizeMode,
    /// Multi-character symbolic operators, longest first.
    operators: Vec<String>,
}

impl Tokenizer {
    pub fn new(mode: TokenizeMode, tables: &CategoryTables) -> Self {
        let operators = match mode {
            TokenizeMode::Single => Vec::new(),
            TokenizeMode::Greedy => greedy_operators(tables),
        };
        Self { mode, operators }
    }

    pub fn tokenize<'s>(&self, source: &'s str) -> Vec<Lexeme<'s>> {
        match self.mode {
            TokenizeMode::Single => tokenize(source),
            TokenizeMode::Greedy => self.tokenize_greedy(source),
        }
    }

    fn tokenize_greedy<'s>(&self, source: &'s str) -> Vec<Lexeme<'s>> {
        let mut lexemes = Vec::new();
        let mut pos = 0;
        while pos < source.len() {
            let rest = &source[pos..];
            let end = match self.operators.iter().find(|op| rest.starts_with(op.as_str())) {
                Some(op) => pos + op.len(),
                None => match WORD_OR_SINGLE.find_at(source, pos) {
                    Some(m) => m.end(),
                    None => break,
                },
            };
            lexemes.push(Lexeme {
                text: &source[pos..end],
                start: pos,
                end,
            });
            pos = end;
        }
        lexemes
    }
}

/// Split `source` with the default single-character rule.
pub fn tokenize(source: &str) -> Vec<Lexeme<'_>> {
    WORD_OR_SINGLE
        .find_iter(source)
        .map(|m| Lexeme {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Operators that the single-character rule would split: at least two
/// characters and no word characters (word operators such as `and` already
/// arrive as one word run).
fn greedy_operators(tables: &CategoryTables) -> Vec<String> {
    let mut operators: Vec<String> = tables
        .entries(TokenCategory::Operator)
        .iter()
        .filter(|op| op.chars().count() > 1 && !op.chars().any(is_word_char))
        .cloned()
        .collect();
    operators.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    operators
}
