/// Categorizes parse errors for programmatic handling.
///
/// Each variant contains minimal data needed for programmatic decisions.
/// Human-readable context belongs in the `notes` of [`CssParseError`].
///
/// [`CssParseError`]: crate::CssParseError
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CssParseErrorKind {
    /// Expected specific token(s) but found something else.
    ///
    /// ```text
    /// a { color red }
    ///           ^^^ expected `:`, found `red`
    /// ```
    #[error("unexpected token: `{found}`")]
    UnexpectedToken {
        expected: Vec<String>,
        found: String,
    },

    /// The stylesheet ended before a complete construct was parsed.
    ///
    /// ```text
    /// a, b
    ///     ^ expected `{`, found end of input
    /// ```
    #[error("unexpected end of input")]
    UnexpectedEof {
        expected: Vec<String>,
    },

    /// The lexer produced an error token (unterminated string, bad
    /// `url(`, unterminated comment, ...). The lexer's message and notes
    /// are carried by the parent `CssParseError`.
    #[error("lexer error")]
    LexerError,

    /// A `{`, `(` or `[` was opened but the input ended first.
    #[error("unclosed delimiter: `{delimiter}`")]
    UnclosedDelimiter {
        delimiter: String,
    },

    /// A closing delimiter that doesn't match the innermost opener.
    ///
    /// ```text
    /// a { width: calc(1px ] }
    ///                     ^ expected `)`, found `]`
    /// ```
    #[error("mismatched delimiter")]
    MismatchedDelimiter {
        expected: String,
        found: String,
    },

    /// A declaration that could not be parsed. Its source text is kept in
    /// the tree as an opaque `Raw` node.
    #[error("invalid declaration")]
    InvalidDeclaration,

    /// An empty entry in a selector list (e.g. `a,,b` or a trailing
    /// comma).
    #[error("empty selector")]
    EmptySelector,

    /// Catch-all for syntax errors without a dedicated variant. The
    /// specific error is described by `CssParseError::message`.
    #[error("invalid syntax")]
    InvalidSyntax,
}
