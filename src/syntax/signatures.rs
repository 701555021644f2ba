//! Function signature extraction from a parsed module.

use super::{SyntaxTree, WalkOrder};
use serde::Serialize;
use std::fmt;
use tracing::debug;
use tree_sitter::Node;

/// A declared function: its name and parameter names in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<String>,
    /// 1-based line of the `def` keyword in the normalized source.
    pub line: usize,
    pub is_async: bool,
    /// Number of enclosing function definitions.
    pub depth: usize,
}

impl FunctionSignature {
    /// Report line in the `Function 'name(a, b)'` style.
    pub fn describe(&self) -> String {
        format!("Function '{self}'")
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

/// Signatures of every function definition, nested ones included, in
/// breadth-first order.
pub fn extract_signatures(tree: &SyntaxTree) -> Vec<FunctionSignature> {
    extract_signatures_with(tree, WalkOrder::BreadthFirst)
}

/// Signatures in an explicit walk order. Use [`WalkOrder::PreOrder`] when
/// strict source order matters.
pub fn extract_signatures_with(tree: &SyntaxTree, order: WalkOrder) -> Vec<FunctionSignature> {
    let signatures: Vec<_> = tree
        .nodes_of_kind("function_definition", order)
        .filter_map(|node| signature_of(tree, node))
        .collect();
    debug!(count = signatures.len(), ?order, "extracted function signatures");
    signatures
}

fn signature_of(tree: &SyntaxTree, node: Node<'_>) -> Option<FunctionSignature> {
    let name = node.child_by_field_name("name")?;
    let params = node
        .child_by_field_name("parameters")
        .map(|parameters| {
            let mut cursor = parameters.walk();
            parameters
                .named_children(&mut cursor)
                .filter_map(|param| parameter_name(tree, param))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(FunctionSignature {
        name: tree.node_text(&name).to_string(),
        params,
        line: node.start_position().row + 1,
        is_async: node.child(0).is_some_and(|first| first.kind() == "async"),
        depth: enclosing_functions(node),
    })
}

/// Bare name of a parameter, without `*`/`**` markers, annotation or
/// default. Separators (`*`, `/`) and comments are not parameters.
fn parameter_name<'t>(tree: &'t SyntaxTree, node: Node<'t>) -> Option<&'t str> {
    match node.kind() {
        "identifier" => Some(tree.node_text(&node)),
        "default_parameter" | "typed_default_parameter" => {
            parameter_name(tree, node.child_by_field_name("name")?)
        }
        "typed_parameter" | "list_splat_pattern" | "dictionary_splat_pattern" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|child| child.kind() != "type")?;
            parameter_name(tree, inner)
        }
        _ => None,
    }
}

fn enclosing_functions(node: Node<'_>) -> usize {
    std::iter::successors(node.parent(), |n| n.parent())
        .filter(|n| n.kind() == "function_definition")
        .count()
}
