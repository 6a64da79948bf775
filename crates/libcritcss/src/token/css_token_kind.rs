use crate::CssErrorNotes;
use std::borrow::Cow;

/// The kind of a CSS token, following the token types of CSS Syntax
/// Level 3.
///
/// Values that carry text store the raw source text so that the parser
/// can rebuild nodes without re-lexing. The `'src` lifetime enables
/// zero-copy lexing: `StrCssTokenSource` borrows slices of the input via
/// `Cow::Borrowed`.
#[derive(Clone, Debug, PartialEq)]
pub enum CssTokenKind<'src> {
    // =========================================================================
    // Punctuators
    // =========================================================================
    /// `-->`
    Cdc,
    /// `<!--`
    Cdo,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `}`
    CurlyBraceClose,
    /// `{`
    CurlyBraceOpen,
    /// `)`
    ParenClose,
    /// `(`
    ParenOpen,
    /// `;`
    Semicolon,
    /// `]`
    SquareBracketClose,
    /// `[`
    SquareBracketOpen,

    // =========================================================================
    // Text-bearing tokens (raw source text only)
    // =========================================================================
    /// `@name`. Stores the name without the `@`.
    AtKeyword(Cow<'src, str>),

    /// `/* ... */`, including the delimiters.
    Comment(Cow<'src, str>),

    /// Any single code point that doesn't start another token.
    Delim(char),

    /// `name(`. Stores the name without the `(`.
    Function(Cow<'src, str>),

    /// `#name`. Stores the name without the `#`.
    Hash(Cow<'src, str>),

    /// An identifier such as `color`, `--brand` or `-webkit-box`.
    Ident(Cow<'src, str>),

    /// A number, percentage or dimension (`1`, `50%`, `-1.5em`).
    Numeric(Cow<'src, str>),

    /// A quoted string, including its quotes (`"a"` or `'a'`).
    QuotedString(Cow<'src, str>),

    /// An unquoted `url(...)`. Stores the contents between the parentheses
    /// with surrounding whitespace trimmed. Quoted urls (`url("a.png")`)
    /// are lexed as a `Function` followed by a `QuotedString`.
    Url(Cow<'src, str>),

    /// A run of whitespace.
    Whitespace,

    // =========================================================================
    // End of input
    // =========================================================================
    Eof,

    // =========================================================================
    // Lexer error (allows error recovery)
    // =========================================================================
    /// A lexer error (unterminated string or comment, bad `url(`, stray
    /// escape). The token's span still covers the offending text so that
    /// it is preserved in the tree.
    Error {
        /// A human-readable error message.
        message: String,
        /// Optional notes providing additional context or suggestions.
        error_notes: CssErrorNotes,
    },
}

impl<'src> CssTokenKind<'src> {
    /// Returns a short description of this token for error messages
    /// (e.g. "`{`", "identifier `red`", "end of input").
    pub fn description(&self) -> String {
        match self {
            CssTokenKind::Cdc => "`-->`".to_string(),
            CssTokenKind::Cdo => "`<!--`".to_string(),
            CssTokenKind::Colon => "`:`".to_string(),
            CssTokenKind::Comma => "`,`".to_string(),
            CssTokenKind::CurlyBraceClose => "`}`".to_string(),
            CssTokenKind::CurlyBraceOpen => "`{`".to_string(),
            CssTokenKind::ParenClose => "`)`".to_string(),
            CssTokenKind::ParenOpen => "`(`".to_string(),
            CssTokenKind::Semicolon => "`;`".to_string(),
            CssTokenKind::SquareBracketClose => "`]`".to_string(),
            CssTokenKind::SquareBracketOpen => "`[`".to_string(),
            CssTokenKind::AtKeyword(name) => format!("at-keyword `@{name}`"),
            CssTokenKind::Comment(_) => "comment".to_string(),
            CssTokenKind::Delim(c) => format!("`{c}`"),
            CssTokenKind::Function(name) => format!("function `{name}(`"),
            CssTokenKind::Hash(name) => format!("`#{name}`"),
            CssTokenKind::Ident(name) => format!("identifier `{name}`"),
            CssTokenKind::Numeric(raw) => format!("number `{raw}`"),
            CssTokenKind::QuotedString(raw) => format!("string {raw}"),
            CssTokenKind::Url(_) => "`url(...)`".to_string(),
            CssTokenKind::Whitespace => "whitespace".to_string(),
            CssTokenKind::Eof => "end of input".to_string(),
            CssTokenKind::Error { message, .. } => message.clone(),
        }
    }

    /// Returns `true` for whitespace and comment tokens.
    pub fn is_whitespace_or_comment(&self) -> bool {
        matches!(self, CssTokenKind::Whitespace | CssTokenKind::Comment(_))
    }

    /// Returns the closing punctuator matching this opening punctuator
    /// (treating `Function` as an opening parenthesis).
    pub fn matching_close(&self) -> Option<char> {
        match self {
            CssTokenKind::CurlyBraceOpen => Some('}'),
            CssTokenKind::ParenOpen | CssTokenKind::Function(_) => Some(')'),
            CssTokenKind::SquareBracketOpen => Some(']'),
            _ => None,
        }
    }

    /// Returns the closing character if this is a closing punctuator.
    pub fn close_char(&self) -> Option<char> {
        match self {
            CssTokenKind::CurlyBraceClose => Some('}'),
            CssTokenKind::ParenClose => Some(')'),
            CssTokenKind::SquareBracketClose => Some(']'),
            _ => None,
        }
    }
}
