//! Category tables for lexical highlighting.
//!
//! Four string tables (keyword, datatype, operator, bracket) drive the
//! classifier. Lookup order is fixed and doubles as the tie-break policy:
//! a string present in more than one table always resolves to the earliest
//! category in [`TokenCategory::PRIORITY`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Highlighting category assigned to every lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenCategory {
    Keyword,
    DataType,
    Operator,
    Bracket,
    Plain,
}

impl TokenCategory {
    /// Table lookup order. `Plain` is the fallback and has no table.
    pub const PRIORITY: [TokenCategory; 4] = [
        TokenCategory::Keyword,
        TokenCategory::DataType,
        TokenCategory::Operator,
        TokenCategory::Bracket,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::DataType => "datatype",
            Self::Operator => "operator",
            Self::Bracket => "bracket",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DEFAULT_KEYWORDS: &[&str] = &[
    // conditionals
    "if", "else",
    // loops
    "for", "while",
    // functions and classes
    "return", "def", "class",
    // imports
    "import", "from", "as",
    // exceptions
    "try", "except", "finally",
];

const DEFAULT_DATATYPES: &[&str] = &[
    "int", "float", "str", "bool", "list", "dict", "tuple", "set", "None",
];

const DEFAULT_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "=", "==", "!=", "<", ">", "<=", ">=", "+=", "-=", "*=", "/=", "and",
    "or", "not",
];

const DEFAULT_BRACKETS: &[&str] = &["(", ")", "[", "]", "{", "}"];

/// One category's entries, kept in insertion order for display plus a set
/// for constant-time membership checks.
#[derive(Debug, Clone, Default)]
struct Table {
    entries: Vec<String>,
    index: HashSet<String>,
}

impl Table {
    fn from_iter<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Table::default();
        for item in items {
            let item = item.into();
            if table.index.insert(item.clone()) {
                table.entries.push(item);
            }
        }
        table
    }

    fn contains(&self, text: &str) -> bool {
        self.index.contains(text)
    }
}

/// Immutable set of category tables.
///
/// Built once (usually from configuration) and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct CategoryTables {
    keywords: Table,
    datatypes: Table,
    operators: Table,
    brackets: Table,
}

impl CategoryTables {
    pub fn new<K, D, O, B>(keywords: K, datatypes: D, operators: O, brackets: B) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        Self {
            keywords: Table::from_iter(keywords),
            datatypes: Table::from_iter(datatypes),
            operators: Table::from_iter(operators),
            brackets: Table::from_iter(brackets),
        }
    }

    /// Entries of a category's table, in configuration order.
    /// `Plain` has no table and yields an empty slice.
    pub fn entries(&self, category: TokenCategory) -> &[String] {
        match self.table(category) {
            Some(table) => table.entries.as_slice(),
            None => &[],
        }
    }

    /// Whether `text` is listed in the table for `category`.
    pub fn contains(&self, category: TokenCategory, text: &str) -> bool {
        self.table(category).is_some_and(|t| t.contains(text))
    }

    /// First category in priority order whose table lists `text`.
    pub fn lookup(&self, text: &str) -> Option<TokenCategory> {
        TokenCategory::PRIORITY
            .into_iter()
            .find(|category| self.contains(*category, text))
    }

    /// Strings that appear in more than one table, with every category that
    /// lists them. Useful for surfacing configuration overlaps.
    pub fn overlaps(&self) -> Vec<(String, Vec<TokenCategory>)> {
        let mut seen = HashSet::new();
        let mut overlaps = Vec::new();
        for category in TokenCategory::PRIORITY {
            for entry in self.entries(category) {
                if !seen.insert(entry.as_str()) {
                    continue;
                }
                let owners: Vec<_> = TokenCategory::PRIORITY
                    .into_iter()
                    .filter(|c| self.contains(*c, entry))
                    .collect();
                if owners.len() > 1 {
                    overlaps.push((entry.clone(), owners));
                }
            }
        }
        overlaps
    }

    fn table(&self, category: TokenCategory) -> Option<&Table> {
        match category {
            TokenCategory::Keyword => Some(&self.keywords),
            TokenCategory::DataType => Some(&self.datatypes),
            TokenCategory::Operator => Some(&self.operators),
            TokenCategory::Bracket => Some(&self.brackets),
            TokenCategory::Plain => None,
        }
    }
}

impl Default for CategoryTables {
    fn default() -> Self {
        Self::new(
            DEFAULT_KEYWORDS.iter().copied(),
            DEFAULT_DATATYPES.iter().copied(),
            DEFAULT_OPERATORS.iter().copied(),
            DEFAULT_BRACKETS.iter().copied(),
        )
    }
}
