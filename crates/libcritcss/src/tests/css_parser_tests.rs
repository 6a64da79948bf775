use crate::ast::BlockContents;
use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::tests::utils::declarations;
use crate::tests::utils::find_first;
use crate::tests::utils::parse_clean;
use crate::tests::utils::set;
use crate::CssParser;

fn labels(tree: &StyleTree, id: NodeId) -> Vec<&'static str> {
    tree.children(id)
        .iter()
        .map(|child| tree.kind(*child).label())
        .collect()
}

// =============================================================================
// Style rules
// =============================================================================

/// Verifies that a style rule is split into a selector list and a
/// declaration block, with one `Selector` per comma-separated entry.
#[test]
fn style_rule_structure() {
    let ast = parse_clean("a, b > c { color: red; margin: 0 !important }");
    let tree = ast.tree();

    assert_eq!(labels(tree, tree.root()), ["Rule"]);
    let rule = tree.rule_ids().next().unwrap();
    assert_eq!(labels(tree, rule), ["SelectorList", "Block"]);
    assert_eq!(ast.selectors(), ["a", "b>c"]);

    let block = tree.block(rule).unwrap();
    assert_eq!(tree.block_contents(block), Some(BlockContents::Declarations));
    assert_eq!(
        declarations(&ast),
        [
            ("color".to_string(), "red".to_string()),
            ("margin".to_string(), "0".to_string()),
        ],
    );
}

/// Verifies that `!important` is recorded on the declaration and kept out
/// of its value, with or without whitespace after the `!`.
#[test]
fn important_flag() {
    let ast = parse_clean("a { color: red ! important; margin: 0 !IMPORTANT; top: 1px }");
    let tree = ast.tree();
    let flags: Vec<(String, bool)> = tree
        .descendants(tree.root())
        .filter_map(|id| match tree.kind(id) {
            NodeKind::Declaration { property, important } => Some((property.clone(), *important)),
            _ => None,
        })
        .collect();
    assert_eq!(
        flags,
        [
            ("color".to_string(), true),
            ("margin".to_string(), true),
            ("top".to_string(), false),
        ],
    );
    assert_eq!(declarations(&ast)[0].1, "red");
}

/// Verifies that a declaration's span runs from its name to the end of its
/// value (including `!important`), without the trailing `;`.
#[test]
fn declaration_spans() {
    let ast = parse_clean("a { margin: 0 !important; color: red; }");
    let tree = ast.tree();
    let texts: Vec<&str> = tree
        .descendants(tree.root())
        .filter(|id| tree.kind(*id).is_declaration())
        .filter_map(|id| ast.original_text(id))
        .collect();
    assert_eq!(texts, ["margin: 0 !important", "color: red"]);
}

/// Verifies that rule spans cover exactly the rule text, leaving the
/// whitespace between rules outside of any rule.
#[test]
fn rule_spans() {
    let ast = parse_clean("a{b:c}\n\n  d { e: f }  ");
    let texts: Vec<&str> = ast
        .tree()
        .rule_ids()
        .filter_map(|id| ast.original_text(id))
        .collect();
    assert_eq!(texts, ["a{b:c}", "d { e: f }"]);
}

/// Verifies that selector text is normalized: comments dropped,
/// whitespace collapsed, combinators tightened.
#[test]
fn selector_text_is_normalized() {
    let ast = parse_clean("a /* x */ >  b ,\n  ul   li + .x ~ p { c: d }");
    assert_eq!(ast.selectors(), ["a>b", "ul li+.x~p"]);
}

/// Verifies that commas inside functional pseudo-classes and attribute
/// selectors don't split the selector list.
#[test]
fn nested_commas_stay_in_one_selector() {
    let ast = parse_clean("a:is(.x, .y), [data-v=\"1,2\"] { c: d }");
    assert_eq!(ast.selectors(), ["a:is(.x, .y)", "[data-v=\"1,2\"]"]);
}

/// Verifies that an empty declaration block parses as a rule without
/// errors.
#[test]
fn empty_block() {
    let ast = parse_clean("a {}");
    let tree = ast.tree();
    let rule = tree.rule_ids().next().unwrap();
    assert!(tree.children(tree.block(rule).unwrap()).is_empty());
    assert!(tree.rule_is_empty(rule));
}

// =============================================================================
// At-rules
// =============================================================================

/// Verifies that an `@media` prelude is split into one `MediaQuery` per
/// comma-separated query and its block holds rules.
#[test]
fn media_rule_structure() {
    let ast = parse_clean("@media screen and (min-width: 1px),  print { a { b: c } }");
    let tree = ast.tree();
    let at_rule = find_first(&ast, "AtRule").unwrap();
    assert_eq!(tree.kind(at_rule).at_rule_name(), Some("media"));
    assert_eq!(labels(tree, at_rule), ["Prelude", "Block"]);

    let prelude = tree.prelude(at_rule).unwrap();
    let queries: Vec<&str> = tree
        .children(prelude)
        .iter()
        .filter_map(|id| match tree.kind(*id) {
            NodeKind::MediaQuery { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(queries, ["screen and (min-width: 1px)", "print"]);

    let block = tree.block(at_rule).unwrap();
    assert_eq!(tree.block_contents(block), Some(BlockContents::Rules));
    assert_eq!(labels(tree, block), ["Rule"]);
}

/// Verifies that descriptor at-rules such as `@font-face` hold
/// declarations.
#[test]
fn font_face_holds_declarations() {
    let ast = parse_clean("@font-face { font-family: Foo; src: url(foo.woff2) format(\"woff2\") }");
    let tree = ast.tree();
    let at_rule = find_first(&ast, "AtRule").unwrap();
    let block = tree.block(at_rule).unwrap();
    assert_eq!(tree.block_contents(block), Some(BlockContents::Declarations));
    assert_eq!(tree.prelude(at_rule), None);

    let properties: Vec<String> = declarations(&ast).into_iter().map(|(p, _)| p).collect();
    assert_eq!(properties, ["font-family", "src"]);
}

/// Verifies that a statement at-rule has a prelude but no block, and that
/// its span includes the `;`.
#[test]
fn statement_at_rule() {
    let ast = parse_clean("@import url(theme.css) screen;\na { b: c }");
    let tree = ast.tree();
    let at_rule = find_first(&ast, "AtRule").unwrap();
    assert_eq!(labels(tree, at_rule), ["Prelude"]);
    assert_eq!(ast.original_text(at_rule), Some("@import url(theme.css) screen;"));

    let prelude = tree.prelude(at_rule).unwrap();
    assert_eq!(labels(tree, prelude), ["Url", "Whitespace", "Ident"]);
    assert_eq!(
        tree.kind(tree.children(prelude)[0]),
        &NodeKind::Url {
            url: "theme.css".to_string(),
            quote: None,
        },
    );
}

/// Verifies that `@keyframes` stops parse as rules inside a rule-list
/// block.
#[test]
fn keyframe_stops_are_rules() {
    let ast = parse_clean("@keyframes spin { from { x: 0 } 50% { x: 1 } to { x: 2 } }");
    let tree = ast.tree();
    let stops: Vec<NodeId> = tree.rule_ids().collect();
    assert_eq!(stops.len(), 3);
    assert!(stops.iter().all(|stop| tree.is_keyframe_rule(*stop)));

    let texts: Vec<String> = stops
        .iter()
        .flat_map(|stop| tree.selectors(*stop))
        .map(|selector| ast.read_value(selector))
        .collect();
    assert_eq!(texts, ["from", "50%", "to"]);
}

/// Verifies that at-rule names keep their spelling, vendor prefix
/// included.
#[test]
fn at_rule_names_are_kept_as_written() {
    let ast = parse_clean("@-webkit-keyframes a { to { b: c } } @MEDIA print { d { e: f } }");
    let tree = ast.tree();
    let names: Vec<&str> = tree
        .descendants(tree.root())
        .filter_map(|id| tree.kind(id).at_rule_name())
        .collect();
    assert_eq!(names, ["-webkit-keyframes", "MEDIA"]);
}

// =============================================================================
// Component values
// =============================================================================

/// Verifies that quoted and unquoted `url()` forms both become `Url`
/// nodes.
#[test]
fn url_forms() {
    let ast = parse_clean("a { b: url(x.png) url(\"y z.png\") url('w.png') }");
    let tree = ast.tree();
    let urls: Vec<&NodeKind> = tree
        .descendants(tree.root())
        .map(|id| tree.kind(id))
        .filter(|kind| matches!(kind, NodeKind::Url { .. }))
        .collect();
    assert_eq!(
        urls,
        [
            &NodeKind::Url { url: "x.png".to_string(), quote: None },
            &NodeKind::Url { url: "y z.png".to_string(), quote: Some('"') },
            &NodeKind::Url { url: "w.png".to_string(), quote: Some('\'') },
        ],
    );
}

/// Verifies that functions nest and keep their arguments as children.
#[test]
fn functions_nest() {
    let ast = parse_clean("a { width: calc(100% - var(--gap, 4px)) }");
    let tree = ast.tree();
    let functions: Vec<&str> = tree
        .descendants(tree.root())
        .filter_map(|id| match tree.kind(id) {
            NodeKind::Function { name } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(functions, ["calc", "var"]);

    let var = tree
        .descendants(tree.root())
        .find(|id| matches!(tree.kind(*id), NodeKind::Function { name } if name == "var"))
        .unwrap();
    assert_eq!(
        labels(tree, var),
        ["Ident", "Comma", "Whitespace", "Other"],
    );
}

/// Verifies that strings record their quote character and raw contents.
#[test]
fn string_literals() {
    let ast = parse_clean("a::before { content: 'it\\'s' }");
    let string = find_first(&ast, "StringLit").unwrap();
    assert_eq!(
        ast.tree().kind(string),
        &NodeKind::StringLit {
            value: "it\\'s".to_string(),
            quote: '\'',
        },
    );
}

/// Verifies that a custom property may have an empty value.
#[test]
fn empty_custom_property() {
    let ast = parse_clean("a { --x: ; --y:{} }");
    assert_eq!(
        declarations(&ast),
        [
            ("--x".to_string(), "".to_string()),
            ("--y".to_string(), "{}".to_string()),
        ],
    );
}

// =============================================================================
// Comments, nesting and CDO/CDC
// =============================================================================

/// Verifies that comments between and inside rules become `Comment`
/// nodes.
#[test]
fn comments_are_nodes() {
    let ast = parse_clean("/* a */ a { /* b */ color: red }");
    let tree = ast.tree();
    assert_eq!(labels(tree, tree.root()), ["Comment", "Rule"]);
    let rule = tree.rule_ids().next().unwrap();
    assert_eq!(labels(tree, tree.block(rule).unwrap()), ["Comment", "Declaration"]);
}

/// Verifies that a non-identifier start inside a declaration block begins
/// a nested rule.
#[test]
fn nested_rules() {
    let ast = parse_clean("a { color: red; &:hover { color: blue } .b & { top: 0 } }");
    let tree = ast.tree();
    let outer = tree.rule_ids().next().unwrap();
    assert_eq!(
        labels(tree, tree.block(outer).unwrap()),
        ["Declaration", "Rule", "Rule"],
    );
    assert_eq!(ast.selectors(), ["a", "&:hover", ".b &"]);
}

/// Verifies that an identifier followed by a block before any `;` or `}`
/// begins a nested rule rather than a malformed declaration.
#[test]
fn nested_rules_starting_with_type_selectors() {
    let ast = parse_clean("a { color: red; b { c: d } div:hover > p { top: 0 } margin: 0 }");
    let tree = ast.tree();
    let outer = tree.rule_ids().next().unwrap();
    assert_eq!(
        labels(tree, tree.block(outer).unwrap()),
        ["Declaration", "Rule", "Rule", "Declaration"],
    );
    assert_eq!(ast.selectors(), ["a", "b", "div:hover>p"]);
    assert!(find_first(&ast, "Raw").is_none());
}

/// Verifies that a custom property whose value holds a block stays a
/// declaration.
#[test]
fn custom_property_with_block_is_a_declaration() {
    let ast = parse_clean("a { --mixin: { color: red }; top: 0 }");
    let tree = ast.tree();
    let outer = tree.rule_ids().next().unwrap();
    assert_eq!(
        labels(tree, tree.block(outer).unwrap()),
        ["Declaration", "Declaration"],
    );
}

/// Verifies that a nested type-selector rule is pruned like any other
/// nested rule.
#[test]
fn nested_type_selector_rules_are_pruned() {
    let mut ast = parse_clean("a { color: red; b { c: d } }");
    assert_eq!(ast.prune_non_critical_selectors(&set(&["a"])), 1);
    assert_eq!(ast.to_css(), "a{color: red}");
}

/// Verifies that at-rules may appear inside declaration blocks.
#[test]
fn nested_at_rules() {
    let ast = parse_clean("a { color: red; @media print { & { color: black } } }");
    let tree = ast.tree();
    let outer = tree.rule_ids().next().unwrap();
    assert_eq!(labels(tree, tree.block(outer).unwrap()), ["Declaration", "AtRule"]);
}

/// Verifies that `<!--` and `-->` at the top level are ignored.
#[test]
fn cdo_and_cdc_are_skipped() {
    let ast = parse_clean("<!-- a { b: c } -->");
    let tree = ast.tree();
    assert_eq!(labels(tree, tree.root()), ["Rule"]);
    assert_eq!(ast.to_css(), "<!-- a { b: c } -->");
}

/// Verifies that the parser can be driven directly and that an empty
/// input produces a bare stylesheet.
#[test]
fn empty_input() {
    let result = CssParser::new("").parse_stylesheet();
    assert!(result.is_ok());
    let tree = result.into_valid_ast().unwrap();
    assert!(tree.children(tree.root()).is_empty());
    assert_eq!(tree.to_css(tree.root(), Some("")), "");
}
