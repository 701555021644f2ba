use super::tables::{CategoryTables, TokenCategory};
use super::Lexeme;
use serde::Serialize;

/// A lexeme paired with the category it was assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifiedToken<'s> {
    #[serde(flatten)]
    pub lexeme: Lexeme<'s>,
    pub category: TokenCategory,
}

/// Assign exactly one category to a lexeme.
///
/// Tables are consulted in [`TokenCategory::PRIORITY`] order and the first
/// exact match wins; anything unmatched is `Plain`.
pub fn classify(lexeme: &Lexeme<'_>, tables: &CategoryTables) -> TokenCategory {
    tables.lookup(lexeme.text).unwrap_or(TokenCategory::Plain)
}

pub fn classify_all<'s>(lexemes: &[Lexeme<'s>], tables: &CategoryTables) -> Vec<ClassifiedToken<'s>> {
    lexemes
        .iter()
        .map(|lexeme| ClassifiedToken {
            lexeme: *lexeme,
            category: classify(lexeme, tables),
        })
        .collect()
}
