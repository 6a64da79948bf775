use crate::ast::AstNode;
use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::CssParser;

fn parse_tree(source: &str) -> StyleTree {
    CssParser::new(source).parse_stylesheet().into_ast().unwrap()
}

fn first(tree: &StyleTree, label: &str) -> NodeId {
    tree.descendants(tree.root())
        .find(|id| tree.kind(*id).label() == label)
        .unwrap()
}

// =============================================================================
// Modification tracking
// =============================================================================

/// Verifies that a parsed tree starts out pristine.
#[test]
fn parsed_nodes_are_pristine() {
    let tree = parse_tree("a { b: c }");
    for id in tree.descendants(tree.root()) {
        assert!(tree.node(id).is_pristine(), "{:?}", tree.node_ref(id));
    }
}

/// Verifies that marking a node modified marks exactly its ancestors.
#[test]
fn modification_propagates_to_ancestors_only() {
    let mut tree = parse_tree("a { b: c } d { e: f }");
    let declaration = first(&tree, "Declaration");
    tree.mark_modified(declaration);

    let modified: Vec<&str> = tree
        .descendants(tree.root())
        .filter(|id| tree.is_modified(*id))
        .map(|id| tree.kind(id).label())
        .collect();
    assert_eq!(modified, ["StyleSheet", "Rule", "Block", "Declaration"]);
}

#[test]
fn synthesized_nodes_are_modified() {
    let mut tree = parse_tree("");
    let node = tree.create_node(NodeKind::Comma);
    assert!(tree.is_modified(node));
    assert!(!tree.node(node).is_pristine());
    assert_eq!(tree.span(node), None);
    assert!(!tree.is_attached(node));
}

// =============================================================================
// Structure edits
// =============================================================================

/// Verifies that detaching removes a node from its parent and that the
/// root can't be detached.
#[test]
fn detach() {
    let mut tree = parse_tree("a { b: c } d { e: f }");
    let root = tree.root();
    let rule = tree.rule_ids().next().unwrap();

    assert!(!tree.detach(root));
    assert!(tree.detach(rule));
    assert!(!tree.detach(rule));
    assert_eq!(tree.children(root).len(), 1);
    assert_eq!(tree.parent(rule), None);
    assert!(tree.is_modified(root));
}

/// Verifies that inserting moves a node from its previous parent and
/// clamps the index.
#[test]
fn insert_child_moves_nodes() {
    let source = "a { b: c } d { e: f }";
    let mut tree = parse_tree(source);
    let rules: Vec<NodeId> = tree.rule_ids().collect();
    let root = tree.root();

    tree.insert_child(root, 0, rules[1]);
    assert_eq!(tree.children(root), [rules[1], rules[0]]);
    assert_eq!(tree.to_css(root, Some(source)), "d { e: f }a { b: c }");

    tree.insert_child(root, 99, rules[1]);
    assert_eq!(tree.children(root), [rules[0], rules[1]]);
}

/// Verifies that edits which would create a cycle or move the root are
/// ignored.
#[test]
fn insert_child_rejects_cycles() {
    let mut tree = parse_tree("a { b: c }");
    let root = tree.root();
    let rule = tree.rule_ids().next().unwrap();
    let block = tree.block(rule).unwrap();

    tree.append_child(block, rule);
    tree.append_child(block, root);
    tree.append_child(rule, rule);
    assert_eq!(tree.parent(rule), Some(root));
    assert_eq!(tree.parent(root), None);
    assert!(!tree.is_modified(root));
}

#[test]
fn replace_keeps_position() {
    let source = "a { b: c; d: e }";
    let mut tree = parse_tree(source);
    let declaration = first(&tree, "Declaration");
    let raw = tree.create_node(NodeKind::Raw { text: "x: y".to_string() });

    assert!(tree.replace(declaration, raw));
    assert!(!tree.replace(declaration, raw));
    assert!(!tree.is_attached(declaration));
    assert_eq!(tree.to_css(tree.root(), Some(source)), "a{x: y;d: e}");
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn ancestors_nearest_first() {
    let tree = parse_tree("@media screen { a { b: c } }");
    let declaration = first(&tree, "Declaration");
    let labels: Vec<&str> = tree
        .ancestors(declaration)
        .map(|id| tree.kind(id).label())
        .collect();
    assert_eq!(labels, ["Block", "Rule", "Block", "AtRule", "StyleSheet"]);
    assert_eq!(
        tree.enclosing_at_rule(declaration).map(|id| tree.kind(id).label()),
        Some("AtRule"),
    );
}

#[test]
fn node_ref_view() {
    let tree = parse_tree("a { b: c }");
    let rule = tree.node_ref(tree.rule_ids().next().unwrap());
    assert_eq!(rule.parent().map(|parent| parent.id()), Some(tree.root()));
    assert_eq!(
        rule.children().map(|child| child.kind().label()).collect::<Vec<_>>(),
        ["SelectorList", "Block"],
    );
    assert_eq!(rule.to_source(None), "a{b:c}");
}
