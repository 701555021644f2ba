//! Tree-sitter parser integration for Python
//!
//! Source text is normalized (common indentation removed, surrounding blank
//! space trimmed) before it reaches the parser, so snippets lifted out of an
//! indented context parse the same as top-level code. The resulting
//! [`SyntaxTree`] owns both the tree and the normalized text it refers to.

pub mod dump;
pub mod signatures;

pub use dump::dump;
pub use signatures::{extract_signatures, extract_signatures_with, FunctionSignature};

use crate::core::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, trace};
use tree_sitter::{Language, Node, Parser, Tree};

/// Longest slice of offending text quoted in a parse error message.
const MAX_ERROR_SNIPPET: usize = 24;

/// Traversal order for [`SyntaxTree::walk`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum WalkOrder {
    /// Level by level: every top-level node before any nested node.
    #[default]
    BreadthFirst,
    /// Depth-first pre-order, i.e. strict source order.
    PreOrder,
}

/// A parsed Python module.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    tree: Tree,
    source: String,
}

impl SyntaxTree {
    /// The normalized text the tree was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn has_errors(&self) -> bool {
        self.root().has_error()
    }

    /// Text covered by a node of this tree.
    pub fn node_text(&self, node: &Node<'_>) -> &str {
        &self.source[node.byte_range()]
    }

    /// Visit every named node reachable from the root.
    pub fn walk(&self, order: WalkOrder) -> NodeWalk<'_> {
        NodeWalk::new(self.root(), order)
    }

    /// Nodes of a given kind, in walk order.
    pub fn nodes_of_kind<'t>(
        &'t self,
        kind: &'t str,
        order: WalkOrder,
    ) -> impl Iterator<Item = Node<'t>> + 't {
        self.walk(order).filter(move |node| node.kind() == kind)
    }
}

/// Iterator over named nodes in breadth-first or pre-order.
pub struct NodeWalk<'t> {
    order: WalkOrder,
    pending: VecDeque<Node<'t>>,
}

impl<'t> NodeWalk<'t> {
    fn new(root: Node<'t>, order: WalkOrder) -> Self {
        Self {
            order,
            pending: VecDeque::from([root]),
        }
    }
}

impl<'t> Iterator for NodeWalk<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        let node = match self.order {
            WalkOrder::BreadthFirst => self.pending.pop_front()?,
            WalkOrder::PreOrder => self.pending.pop_back()?,
        };
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
        match self.order {
            WalkOrder::BreadthFirst => self.pending.extend(children),
            WalkOrder::PreOrder => self.pending.extend(children.into_iter().rev()),
        }
        Some(node)
    }
}

fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Parse Python source into a syntax tree.
///
/// Fails when the parser reports any error or missing node; the first one in
/// source order provides the message and location.
pub fn parse(source: &str) -> Result<SyntaxTree, ParseError> {
    let normalized = normalize_source(source);

    let mut parser = Parser::new();
    parser
        .set_language(&python_language())
        .map_err(|e| ParseError::new(format!("failed to load Python grammar: {e}")))?;

    let tree = parser
        .parse(&normalized, None)
        .ok_or_else(|| ParseError::new("parser produced no tree"))?;

    let syntax_tree = SyntaxTree {
        tree,
        source: normalized,
    };

    if syntax_tree.has_errors() {
        let error = locate_error(&syntax_tree);
        debug!(%error, "rejecting source with syntax errors");
        return Err(error);
    }

    trace!(
        bytes = syntax_tree.source.len(),
        "parsed source into syntax tree"
    );
    Ok(syntax_tree)
}

/// Remove the common leading whitespace of all non-blank lines, then trim
/// blank space from both ends. Whitespace-only lines become empty and
/// `\r\n` line endings become `\n`.
pub fn normalize_source(source: &str) -> String {
    let unified = source.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = unified
        .split('\n')
        .map(|line| if line.trim().is_empty() { "" } else { line })
        .collect();

    let margin = lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| leading_whitespace(line))
        .reduce(common_prefix)
        .unwrap_or("");

    let dedented: Vec<&str> = lines
        .iter()
        .map(|line| line.strip_prefix(margin).unwrap_or(*line))
        .collect();

    dedented.join("\n").trim().to_string()
}

fn leading_whitespace(line: &str) -> &str {
    let end = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..end]
}

fn common_prefix<'a>(a: &'a str, b: &'a str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

fn locate_error(tree: &SyntaxTree) -> ParseError {
    match first_error_node(tree.root()) {
        Some(node) => {
            let position = node.start_position();
            let message = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                let text = tree.node_text(&node).trim();
                if text.is_empty() {
                    "unexpected end of input".to_string()
                } else {
                    format!("unexpected `{}`", snippet(text))
                }
            };
            let line_start = tree.source[..node.start_byte()]
                .rfind('\n')
                .map_or(0, |i| i + 1);
            let column = tree.source[line_start..node.start_byte()].chars().count() + 1;
            ParseError::at(message, position.row + 1, column)
        }
        None => ParseError::new("invalid syntax"),
    }
}

/// First `ERROR` or `MISSING` node in source order, looking through
/// anonymous nodes as well.
fn first_error_node(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_node)
}

fn snippet(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("");
    match first_line.char_indices().nth(MAX_ERROR_SNIPPET) {
        Some((cut, _)) => format!("{}...", &first_line[..cut]),
        None => first_line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_source_dedents_and_trims() {
        let source = "\n    def f(a):\n        return a\n\n";
        assert_eq!(normalize_source(source), "def f(a):\n    return a");
    }

    #[test]
    fn test_normalize_source_ignores_blank_lines_for_margin() {
        let source = "    x = 1\n\n  \n    y = 2";
        assert_eq!(normalize_source(source), "x = 1\n\n\ny = 2");
    }

    #[test]
    fn test_normalize_source_mixed_tabs_and_spaces_strip_exact_prefix() {
        let source = "if x:\n\t  a\n\t b";
        assert_eq!(normalize_source(source), "if x:\n\t  a\n\t b");
        let source = "\t\tif x:\n\t\t\ta";
        assert_eq!(normalize_source(source), "if x:\n\ta");
    }

    #[test]
    fn test_normalize_source_crlf() {
        assert_eq!(normalize_source("x = 1\r\ny = 2\r\n"), "x = 1\ny = 2");
    }

    #[test]
    fn test_parse_valid_module() {
        let tree = parse("def hello():\n    return 'world'\n").unwrap();
        assert!(!tree.has_errors());
        assert_eq!(tree.root().kind(), "module");
        assert_eq!(tree.source(), "def hello():\n    return 'world'");
    }

    #[test]
    fn test_parse_indented_snippet() {
        let source = "
            def my_function(a, b):
                return a + b
        ";
        let tree = parse(source).unwrap();
        assert_eq!(
            tree.nodes_of_kind("function_definition", WalkOrder::PreOrder)
                .count(),
            1
        );
    }

    #[test]
    fn test_parse_empty_source() {
        let tree = parse("").unwrap();
        assert_eq!(tree.root().named_child_count(), 0);
    }

    #[test]
    fn test_parse_error_has_location() {
        let err = parse("x = 1\ndef (:\n").unwrap_err();
        assert!(matches!(err.line, Some(1..=2)), "got {err}");
        assert!(err.column.is_some());
    }

    #[test]
    fn test_parse_rejects_dangling_parameter_list() {
        assert!(parse("function (").is_err());
        assert!(parse("def add(a, b").is_err());
    }

    #[test]
    fn test_walk_orders_differ_for_nested_nodes() {
        let tree = parse("def a():\n    def b():\n        pass\ndef c():\n    pass").unwrap();
        let name = |order| -> Vec<String> {
            tree.nodes_of_kind("function_definition", order)
                .filter_map(|n| n.child_by_field_name("name"))
                .map(|n| tree.node_text(&n).to_string())
                .collect()
        };
        assert_eq!(name(WalkOrder::BreadthFirst), vec!["a", "c", "b"]);
        assert_eq!(name(WalkOrder::PreOrder), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_snippet_truncates_long_text() {
        let long = "x".repeat(40);
        assert_eq!(snippet(&long), format!("{}...", "x".repeat(24)));
        assert_eq!(snippet("ab\ncd"), "ab");
    }
}
