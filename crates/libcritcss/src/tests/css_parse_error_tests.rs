//! Tests for diagnostic formatting.

use crate::CssParseErrorKind;
use crate::CssParser;
use std::path::Path;

#[test]
fn format_oneline_uses_one_based_positions() {
    let result = CssParser::new("a { color }").parse_stylesheet();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].format_oneline(),
        "<input>:1:11: error: Expected `:` after property name `color`, found `}`",
    );
}

#[test]
fn format_oneline_includes_file_path() {
    let path = Path::new("styles/site.css");
    let result = CssParser::with_file_path("a {\n  color\n}", path).parse_stylesheet();
    assert_eq!(result.errors.len(), 1);
    assert!(
        result.errors[0]
            .format_oneline()
            .starts_with("styles/site.css:3:1: error:"),
        "{}",
        result.errors[0].format_oneline(),
    );
}

/// Verifies the rustc-style rendering: header, location, source line,
/// caret underline and help note.
#[test]
fn format_detailed_renders_snippet_and_help() {
    let source = "a { color }";
    let result = CssParser::new(source).parse_stylesheet();
    let detailed = result.errors[0].format_detailed(Some(source));
    assert_eq!(
        detailed,
        "error: Expected `:` after property name `color`, found `}`\n\
         \x20 --> <input>:1:11\n\
         \x20  |\n\
         \x201 | a { color }\n\
         \x20  |           ^\n\
         \x20  = help: Declarations are written as `property: value`\n",
    );
}

#[test]
fn format_detailed_without_source_omits_snippet() {
    let result = CssParser::new("a { color }").parse_stylesheet();
    let detailed = result.errors[0].format_detailed(None);
    assert!(!detailed.contains(" | "));
    assert!(detailed.contains("= help:"));
}

/// Verifies that an unclosed block points back at its opening brace.
#[test]
fn unclosed_block_note_points_at_opener() {
    let source = "a {\n  color: red;\n";
    let result = CssParser::new(source).parse_stylesheet();
    let error = result
        .errors
        .iter()
        .find(|error| matches!(error.kind(), CssParseErrorKind::UnclosedDelimiter { .. }))
        .expect("unclosed block should be reported");
    let note = error
        .notes()
        .iter()
        .find(|note| note.span.is_some())
        .expect("note with span");
    let opener = note.span.as_ref().map(|span| span.start_inclusive.byte_offset());
    assert_eq!(opener, Some(2));
    assert!(error.format_detailed(Some(source)).contains("rule block opened here"));
}

#[test]
fn display_matches_oneline() {
    let result = CssParser::new("a { color }").parse_stylesheet();
    assert_eq!(result.errors[0].to_string(), result.errors[0].format_oneline());
}
