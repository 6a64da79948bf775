//! Various test utils.

use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::StyleAst;
use indexmap::IndexSet;

/// Parses `css`, asserting that it is not fatally rejected.
pub fn parse(css: &str) -> StyleAst {
    StyleAst::parse(css).expect("stylesheet should parse")
}

/// Parses `css`, asserting that it produced no diagnostics.
pub fn parse_clean(css: &str) -> StyleAst {
    let ast = parse(css);
    assert!(
        ast.errors().is_empty(),
        "unexpected diagnostics for {css:?}: {:#?}",
        ast.errors(),
    );
    ast
}

/// Builds an insertion-ordered string set.
pub fn set(items: &[&str]) -> IndexSet<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Returns the first attached node of the given kind label, in document
/// order.
pub fn find_first(ast: &StyleAst, label: &str) -> Option<NodeId> {
    let tree = ast.tree();
    tree.descendants(tree.root())
        .find(|id| tree.kind(*id).label() == label)
}

/// Returns every attached declaration as `(property, value css)` pairs.
pub fn declarations(ast: &StyleAst) -> Vec<(String, String)> {
    let tree = ast.tree();
    tree.descendants(tree.root())
        .filter_map(|id| match tree.kind(id) {
            NodeKind::Declaration { property, .. } => {
                let value = tree
                    .value(id)
                    .map(|value| tree.to_css(value, Some(ast.css())))
                    .unwrap_or_default();
                Some((property.clone(), value))
            },
            _ => None,
        })
        .collect()
}
