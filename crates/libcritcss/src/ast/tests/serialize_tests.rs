use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::CssParser;

fn parse_tree(source: &str) -> StyleTree {
    CssParser::new(source).parse_stylesheet().into_ast().unwrap()
}

fn structural(source: &str) -> String {
    let tree = parse_tree(source);
    tree.to_css(tree.root(), None)
}

// =============================================================================
// Structural mode
// =============================================================================

#[test]
fn structural_rules_and_declarations() {
    assert_eq!(structural("a , b { color : red ; }"), "a,b{color:red}");
    assert_eq!(structural("a { b: c ! important }"), "a{b:c!important}");
    assert_eq!(structural("a { margin: 0   auto }"), "a{margin:0 auto}");
    assert_eq!(structural("a {}"), "a{}");
}

#[test]
fn structural_at_rules() {
    assert_eq!(structural("@import  'x.css'  ;"), "@import 'x.css';");
    assert_eq!(structural("@font-face { src: url(a.woff) }"), "@font-face{src:url(a.woff)}");
    assert_eq!(
        structural("@media screen ,  print { a { b: c } }"),
        "@media screen,print{a{b:c}}",
    );
    assert_eq!(structural("@layer;"), "@layer;");
}

/// Verifies that rule-list blocks get no separators while declaration
/// blocks separate declarations and raw entries with `;`.
#[test]
fn structural_block_separators() {
    assert_eq!(
        structural("@media screen { a { b: c } d { e: f } }"),
        "@media screen{a{b:c}d{e:f}}",
    );
    assert_eq!(structural("a { b: c; d; e: f }"), "a{b:c;d;e:f}");
    assert_eq!(structural("a { b: c; &:hover { d: e } f: g }"), "a{b:c;&:hover{d:e}f:g}");
}

#[test]
fn structural_component_values() {
    assert_eq!(
        structural("a { b: calc( 1px + 2px ) [x] 'q' url( \"y.png\" ) #fff }"),
        "a{b:calc( 1px + 2px ) [x] 'q' url(\"y.png\") #fff}",
    );
}

// =============================================================================
// Mixed mode
// =============================================================================

/// Verifies that an unquoted url rewritten to contain characters that
/// would break `url(...)` is quoted on output.
#[test]
fn rewritten_urls_are_quoted_when_needed() {
    let source = "a { b: url(x.png) }";
    let mut tree = parse_tree(source);
    let url = tree
        .descendants(tree.root())
        .find(|id| matches!(tree.kind(*id), NodeKind::Url { .. }))
        .unwrap();
    tree.set_kind(
        url,
        NodeKind::Url {
            url: "my \"file\".png".to_string(),
            quote: None,
        },
    );
    assert_eq!(tree.to_css(tree.root(), Some(source)), "a{b:url(\"my \\\"file\\\".png\")}");
}

/// Verifies that a synthesized declaration appended to a parsed block is
/// rendered structurally next to pristine siblings.
#[test]
fn synthesized_declaration() {
    let source = "a { color: red }";
    let mut tree = parse_tree(source);
    let rule = tree.rule_ids().next().unwrap();
    let block = tree.block(rule).unwrap();

    let declaration = tree.create_node(NodeKind::Declaration {
        property: "top".to_string(),
        important: true,
    });
    let value = tree.create_node(NodeKind::Value);
    let zero = tree.create_node(NodeKind::Other { text: "0".to_string() });
    tree.append_child(value, zero);
    tree.append_child(declaration, value);
    tree.append_child(block, declaration);

    assert_eq!(tree.to_css(tree.root(), Some(source)), "a{color: red;top:0!important}");
}
