use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::tests::utils::find_first;
use crate::tests::utils::parse;
use crate::NodeVisitor;
use crate::VisitAction;
use crate::WalkStats;

/// Records every visited node's label and otherwise continues.
#[derive(Default)]
struct Recorder {
    labels: Vec<&'static str>,
}

impl NodeVisitor for Recorder {
    fn visit(&mut self, tree: &mut StyleTree, id: NodeId) -> VisitAction {
        self.labels.push(tree.kind(id).label());
        VisitAction::Continue
    }
}

// =============================================================================
// Traversal
// =============================================================================

/// Verifies that nodes are visited in pre-order.
#[test]
fn visits_in_pre_order() {
    let mut ast = parse("a{b:c}");
    let mut recorder = Recorder::default();
    let stats = ast.walk(&mut recorder);
    assert_eq!(
        recorder.labels,
        [
            "StyleSheet",
            "Rule",
            "SelectorList",
            "Selector",
            "Ident",
            "Block",
            "Declaration",
            "Value",
            "Ident",
        ],
    );
    assert_eq!(
        stats,
        WalkStats {
            visited: 9,
            removed: 0,
            cascaded: 0,
        },
    );
}

/// Verifies that `SkipChildren` keeps a subtree out of the traversal.
#[test]
fn skip_children_prunes_traversal() {
    let mut ast = parse("a{b:c} d{e:f}");
    let mut seen = Vec::new();
    ast.walk(&mut |tree: &mut StyleTree, id: NodeId| {
        seen.push(tree.kind(id).label());
        match tree.kind(id) {
            NodeKind::Rule => VisitAction::SkipChildren,
            _ => VisitAction::Continue,
        }
    });
    assert_eq!(seen, ["StyleSheet", "Rule", "Rule"]);
}

/// Verifies that a walk can start below the root.
#[test]
fn walks_from_inner_node() {
    let mut ast = parse("a{b:c} d{e:f;g:h}");
    let second = ast.tree().rule_ids().nth(1).unwrap();
    let mut declarations = 0;
    let tree = &mut ast.tree;
    tree.walk(second, &mut |tree: &mut StyleTree, id: NodeId| {
        if tree.kind(id).is_declaration() {
            declarations += 1;
        }
        VisitAction::Continue
    });
    assert_eq!(declarations, 2);
}

// =============================================================================
// Removal and cascading
// =============================================================================

/// Verifies that removing one of several selectors keeps the rule.
#[test]
fn removing_some_selectors_keeps_rule() {
    let mut ast = parse("a, b { c: d }");
    let stats = ast.walk(&mut |tree: &mut StyleTree, id: NodeId| match tree.kind(id) {
        NodeKind::Selector { text } if text == "a" => VisitAction::Remove,
        _ => VisitAction::Continue,
    });
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.cascaded, 0);
    assert_eq!(ast.to_css(), "b{ c: d }");
}

/// Verifies that removing the last declaration of a rule nested in an
/// at-rule removes both.
#[test]
fn removal_cascades_through_at_rules() {
    let mut ast = parse("@media screen { @supports (display: grid) { a { b: c } } } d { e: f }");
    let stats = ast.walk(&mut |tree: &mut StyleTree, id: NodeId| match tree.kind(id) {
        NodeKind::Declaration { property, .. } if property == "b" => VisitAction::Remove,
        _ => VisitAction::Continue,
    });
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.cascaded, 3);
    assert_eq!(ast.to_css(), "d { e: f }");
}

/// Verifies that cascades are deferred: the visitor still sees the rest
/// of a rule whose selectors it removed.
#[test]
fn cascade_is_deferred_until_walk_ends() {
    let mut ast = parse("a { b: c; d: e }");
    let mut declarations_seen = 0;
    let stats = ast.walk(&mut |tree: &mut StyleTree, id: NodeId| match tree.kind(id) {
        NodeKind::Selector { .. } => VisitAction::Remove,
        NodeKind::Declaration { .. } => {
            declarations_seen += 1;
            VisitAction::SkipChildren
        },
        _ => VisitAction::Continue,
    });
    assert_eq!(declarations_seen, 2);
    assert_eq!(stats.cascaded, 1);
    assert_eq!(ast.rule_count(), 0);
}

/// Verifies that removing a comment from a rule with declarations does
/// not cascade, and that a rule left with only comments does.
#[test]
fn comments_do_not_keep_rules_alive() {
    let mut ast = parse("a { /* x */ b: c } d { /* y */ e: f }");
    let stats = ast.walk(&mut |tree: &mut StyleTree, id: NodeId| match tree.kind(id) {
        NodeKind::Comment { text } if text == "/* x */" => VisitAction::Remove,
        NodeKind::Declaration { property, .. } if property == "e" => VisitAction::Remove,
        _ => VisitAction::Continue,
    });
    assert_eq!(stats.removed, 2);
    assert_eq!(stats.cascaded, 1);
    assert_eq!(ast.to_css(), "a{b: c}");
}

/// Verifies that asking to remove the root is ignored.
#[test]
fn root_is_never_removed() {
    let mut ast = parse("a { b: c }");
    let stats = ast.walk(&mut |_: &mut StyleTree, _: NodeId| VisitAction::Remove);
    assert_eq!(stats.removed, 0);
    assert_eq!(ast.to_css(), "a { b: c }");
}

/// Verifies that removed nodes stay in the arena but are detached.
#[test]
fn removed_nodes_are_detached_not_freed() {
    let mut ast = parse("a { b: c } d { e: f }");
    let arena_len = ast.tree().arena_len();
    let declaration = find_first(&ast, "Declaration").unwrap();
    let rule = ast.tree().parent(ast.tree().parent(declaration).unwrap()).unwrap();

    assert_eq!(ast.tree.remove(declaration), 2);
    assert!(!ast.tree().is_attached(declaration));
    assert!(!ast.tree().is_attached(rule));
    assert_eq!(ast.tree().arena_len(), arena_len);
    assert_eq!(ast.tree.remove(declaration), 0);
    assert_eq!(ast.to_css(), "d { e: f }");
}

// =============================================================================
// Empty-rule cleanup
// =============================================================================

/// Verifies that empty rules and at-rules are removed innermost first, so
/// an at-rule containing only empty rules goes too.
#[test]
fn remove_empty_rules_innermost_first() {
    let mut ast = parse("a{} @media screen{} @media print{b{}} @import 'x'; c{/* only */}");
    assert_eq!(ast.remove_empty_rules(), 5);
    assert_eq!(ast.to_css(), "@import 'x';");
}

/// Verifies that a stylesheet without empty rules is left untouched.
#[test]
fn remove_empty_rules_is_noop_on_full_rules() {
    let css = "a { b: c }\n@media screen { d { e: f } }";
    let mut ast = parse(css);
    assert_eq!(ast.remove_empty_rules(), 0);
    assert_eq!(ast.to_css(), css);
}
