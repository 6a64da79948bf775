//! Tests for `CssTokenKind` helper methods.

use crate::token::CssTokenKind;
use std::borrow::Cow;

/// Verifies that descriptions used in error messages name the token.
#[test]
fn description_names_the_token() {
    assert_eq!(CssTokenKind::CurlyBraceOpen.description(), "`{`");
    assert_eq!(
        CssTokenKind::Ident(Cow::Borrowed("red")).description(),
        "identifier `red`",
    );
    assert_eq!(
        CssTokenKind::AtKeyword(Cow::Borrowed("media")).description(),
        "at-keyword `@media`",
    );
    assert_eq!(CssTokenKind::Eof.description(), "end of input");
}

#[test]
fn whitespace_and_comments_are_classified_together() {
    assert!(CssTokenKind::Whitespace.is_whitespace_or_comment());
    assert!(CssTokenKind::Comment(Cow::Borrowed("/**/")).is_whitespace_or_comment());
    assert!(!CssTokenKind::Semicolon.is_whitespace_or_comment());
}

/// Verifies that functions are treated as opening parentheses when
/// matching delimiters.
#[test]
fn matching_close_for_openers() {
    assert_eq!(CssTokenKind::CurlyBraceOpen.matching_close(), Some('}'));
    assert_eq!(CssTokenKind::SquareBracketOpen.matching_close(), Some(']'));
    assert_eq!(
        CssTokenKind::Function(Cow::Borrowed("calc")).matching_close(),
        Some(')'),
    );
    assert_eq!(CssTokenKind::Colon.matching_close(), None);
    assert_eq!(CssTokenKind::ParenClose.close_char(), Some(')'));
}
