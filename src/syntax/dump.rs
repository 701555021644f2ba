//! Indented textual view of a syntax tree, for debugging and snapshots.
//!
//! One named node per line:
//!
//! ```text
//! module [0:0-1:16]
//!     function_definition [0:0-1:16]
//!         name: identifier [0:4-0:7] "add"
//! ```
//!
//! Anonymous nodes (keywords, punctuation) are omitted. Leaves carry their
//! source text, quoted with Rust escaping.

use super::SyntaxTree;
use std::fmt::Write as _;
use tree_sitter::TreeCursor;

/// Render `tree` with `indent` spaces per nesting level.
pub fn dump(tree: &SyntaxTree, indent: usize) -> String {
    let mut out = String::new();
    let mut cursor = tree.root().walk();
    write_node(tree, &mut cursor, 0, indent, &mut out);
    out
}

fn write_node(
    tree: &SyntaxTree,
    cursor: &mut TreeCursor<'_>,
    level: usize,
    indent: usize,
    out: &mut String,
) {
    let node = cursor.node();
    let child_level = if node.is_named() {
        out.push_str(&" ".repeat(level * indent));
        if let Some(field) = cursor.field_name() {
            let _ = write!(out, "{field}: ");
        }
        let kind = if node.is_missing() {
            format!("MISSING {}", node.kind())
        } else {
            node.kind().to_string()
        };
        let start = node.start_position();
        let end = node.end_position();
        let _ = write!(
            out,
            "{kind} [{}:{}-{}:{}]",
            start.row, start.column, end.row, end.column
        );
        if node.child_count() == 0 {
            let _ = write!(out, " {:?}", tree.node_text(&node));
        }
        out.push('\n');
        level + 1
    } else {
        level
    };

    if cursor.goto_first_child() {
        loop {
            write_node(tree, cursor, child_level, indent, out);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}
