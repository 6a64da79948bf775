use crate::tests::utils::parse;
use crate::ByteSpan;
use crate::CssSourceSpan;
use std::path::Path;

/// Verifies that `\r\n` counts as a single line break and that `\r` and
/// form feed on their own also end a line.
#[test]
fn line_breaks() {
    let span = CssSourceSpan::from_byte_span("a\r\nb\rc\u{c}d", ByteSpan::new(3, 8), None);
    assert_eq!(span.start_inclusive.line(), 1);
    assert_eq!(span.start_inclusive.col_utf8(), 0);
    assert_eq!(span.end_exclusive.line(), 3);
    assert_eq!(span.end_exclusive.col_utf8(), 1);
    assert_eq!(span.byte_span(), ByteSpan::new(3, 8));
}

/// Verifies that columns count characters, both as UTF-8 chars and as
/// UTF-16 code units.
#[test]
fn multibyte_columns() {
    let source = "/* 😀é */\ra";
    let span = CssSourceSpan::from_byte_span(source, ByteSpan::new(12, 14), None);
    assert_eq!(span.start_inclusive.line(), 0);
    assert_eq!(span.start_inclusive.col_utf8(), 8);
    assert_eq!(span.start_inclusive.col_utf16(), 9);
    assert_eq!(span.end_exclusive.line(), 1);
    assert_eq!(span.end_exclusive.col_utf8(), 1);
    assert_eq!(span.slice(source), Some("\ra"));
}

/// Verifies that offsets inside a character or past the end of the source
/// are pulled back to the nearest valid position.
#[test]
fn offsets_are_clamped() {
    let source = "/* 😀 */a";
    let span = CssSourceSpan::from_byte_span(source, ByteSpan::new(5, 99), None);
    assert_eq!(span.start_inclusive.byte_offset(), 3);
    assert_eq!(span.start_inclusive.col_utf8(), 3);
    assert_eq!(span.end_exclusive.byte_offset(), source.len());
    assert_eq!(span.end_exclusive.col_utf8(), 8);
    assert_eq!(span.slice(source), Some("😀 */a"));
}

#[test]
fn file_path_is_kept() {
    let path = Path::new("styles/site.css");
    let span = CssSourceSpan::from_byte_span("a{}", ByteSpan::new(0, 1), Some(path));
    assert_eq!(span.file_path.as_deref(), Some(path));
    assert_eq!(span.slice("a{}"), Some("a"));
}

/// Verifies that diagnostics report the same positions as resolving their
/// byte range directly.
#[test]
fn parse_errors_resolve_their_byte_spans() {
    let css = "a { b: 'é' }\r\n  } d { e: f }";
    let ast = parse(css);
    assert!(!ast.errors().is_empty());
    for error in ast.errors() {
        let span = error.span();
        let resolved = CssSourceSpan::from_byte_span(css, span.byte_span(), None);
        assert_eq!(span.start_inclusive, resolved.start_inclusive, "{}", error.message());
        assert_eq!(span.end_exclusive, resolved.end_exclusive, "{}", error.message());
    }
}
