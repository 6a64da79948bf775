use crate::tests::utils::parse;
use crate::VisitAction;

const FAITHFUL_INPUTS: &[&str] = &[
    "",
    "   \n\t ",
    "a{color:red}",
    "a  {  color :  red  ;  }\n\n\n",
    "/* only a comment */",
    "a,\nb\n{\n  color: red;\n  margin: 0 auto !important;\n}\n",
    "@charset \"utf-8\";\r\n@import url('x.css') screen;\r\n",
    "@media screen and (max-width: 600px) { .a { b: c } }",
    "@font-face { font-family: \"Open Sans\"; src: url(a.woff2) format('woff2') }",
    "@keyframes k { 0% { opacity: 0 } 100% { opacity: 1 } }",
    "a::after { content: \"\u{2192} \u{2713}\" } /* \u{00e9} */",
    "\u{FEFF}a { b: c }",
    ".a\\:hover { color: #FFF }",
    "a { --empty: ; --json: { \"a\": 1 } }",
    "<!-- a { b: c } -->",
    "a { b: c } } d { e }",
    "a { width: calc(1px + ",
];

/// Verifies that parsing and serializing without changes reproduces
/// every input exactly, malformed ones included.
#[test]
fn unmodified_trees_serialize_to_their_input() {
    for css in FAITHFUL_INPUTS {
        let ast = parse(css);
        assert_eq!(&ast.to_css(), css, "round trip of {css:?}");
        assert!(!ast.tree().is_modified(ast.tree().root()));
    }
}

/// Verifies that a walk that changes nothing leaves the tree pristine.
#[test]
fn no_op_walk_keeps_tree_pristine() {
    let css = "a { b: c }\n@media screen { d { e: f } }";
    let mut ast = parse(css);
    let stats = ast.walk(&mut |_: &mut crate::ast::StyleTree, _: crate::ast::NodeId| {
        VisitAction::Continue
    });
    assert!(stats.visited > 0);
    assert_eq!(stats.removed, 0);
    assert_eq!(ast.to_css(), css);
}

/// Verifies that subtrees untouched by a prune keep their original
/// formatting while modified ones are rebuilt.
#[test]
fn untouched_siblings_keep_formatting() {
    let mut ast = parse("a { color: red; cursor: pointer }\n\nb {\n  top: 0;\n}\n");
    assert_eq!(ast.prune_excluded_properties(), 1);
    assert_eq!(ast.to_css(), "a{color: red}b {\n  top: 0;\n}");
}

/// Verifies that comments left in a rebuilt block stay where they were
/// and don't receive separators.
#[test]
fn comments_survive_structural_blocks() {
    let mut ast = parse("a { /* keep */ color: red; cursor: x; top: 0 }");
    ast.prune_excluded_properties();
    assert_eq!(ast.to_css(), "a{/* keep */color: red;top: 0}");
}

/// Verifies that the original text of a node stays available after it
/// was modified.
#[test]
fn original_text_survives_modification() {
    let mut ast = parse("a { color: red; cursor: x }");
    let rule = ast.tree().rule_ids().next().unwrap();
    ast.prune_excluded_properties();
    assert!(ast.tree().is_modified(rule));
    assert_eq!(ast.original_text(rule), Some("a { color: red; cursor: x }"));
    assert_eq!(ast.tree().to_css(rule, Some(ast.css())), "a{color: red}");
}

/// Verifies that serializing without source text rebuilds every node.
#[test]
fn structural_mode_without_source() {
    let ast = parse("a , b { color : red ; margin : 0 !important }  @import \"x.css\" ;");
    let tree = ast.tree();
    assert_eq!(
        tree.to_css(tree.root(), None),
        "a,b{color:red;margin:0!important}@import \"x.css\";",
    );
}
