//! End-to-end behavior of the main pruning passes on small stylesheets.

use crate::tests::utils::parse_clean;
use crate::tests::utils::set;
use indexmap::IndexSet;
use url::Url;

/// Verifies that pruning to a critical set drops rules whose selectors
/// are all non-critical and keeps the critical rule verbatim.
#[test]
fn critical_selector_pruning() {
    let ast = parse_clean("a{color:red}.b{color:blue}");
    let pruned = ast.pruned(&set(&[".b"]));
    assert_eq!(pruned.to_css(), ".b{color:blue}");
}

/// Verifies that print-only media blocks are removed by media query
/// pruning.
#[test]
fn print_media_pruning() {
    let mut ast = parse_clean("@media print{a{color:red}} a{color:blue}");
    assert_eq!(ast.prune_media_queries(), 1);
    assert_eq!(ast.to_css(), "a{color:blue}");
}

/// Verifies that removing an unused custom property definition leaves
/// its references in place.
#[test]
fn unused_variable_pruning_keeps_references() {
    let mut ast = parse_clean(":root{--x:1px} a{margin:var(--x)}");
    assert_eq!(ast.get_used_variables(), set(&["--x"]));

    assert_eq!(ast.prune_unused_variables(&IndexSet::new()), 1);
    assert_eq!(ast.to_css(), "a{margin:var(--x)}");
}

/// Verifies that a declaration carrying a large base64 embed is removed
/// and that the rule it leaves empty goes with it.
#[test]
fn large_embed_pruning_cascades() {
    let css = format!(
        "a{{background:url(data:image/png;base64,{})}}",
        "A".repeat(9000),
    );
    let mut ast = parse_clean(&css);
    assert_eq!(ast.prune_large_base64_embeds(), 1);
    assert_eq!(ast.rule_count(), 0);
    assert_eq!(ast.to_css(), "");
}

/// Verifies that relative urls are resolved against the stylesheet url.
#[test]
fn url_absolutification() {
    let mut ast = parse_clean("a{background:url(../img/x.png)}");
    let base = Url::parse("https://example.com/css/").unwrap();
    assert_eq!(ast.absolutify_urls(&base), 1);
    assert_eq!(ast.to_css(), "a{background:url(https://example.com/img/x.png)}");
}
