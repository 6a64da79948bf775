use crate::token::CssTokenKind;
use crate::CssSourceSpan;

/// A CSS token with location (span) information.
///
/// Unlike languages where whitespace and comments are pure trivia, CSS
/// whitespace is significant (it is the descendant combinator in
/// selectors and separates value components), and comments become nodes
/// of the tree so that they can be pruned. Both are therefore emitted as
/// regular tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct CssToken<'src> {
    /// The kind of token (including Error for lexer errors).
    pub kind: CssTokenKind<'src>,

    /// The source location span of this token.
    pub span: CssSourceSpan,
}

impl<'src> CssToken<'src> {
    pub fn new(kind: CssTokenKind<'src>, span: CssSourceSpan) -> Self {
        Self { kind, span }
    }
}
