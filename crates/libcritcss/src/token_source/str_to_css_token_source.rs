//! A [`CssTokenSource`](crate::token_source::CssTokenSource) that lexes
//! from a `&str` input.
//!
//! This lexer implements zero-copy lexing: token values borrow directly from
//! the source string using `Cow::Borrowed`, avoiding allocations for names,
//! numbers, strings and comments.
//!
//! Tokenization follows CSS Syntax Level 3 (section 4, "Tokenization")
//! with two deviations: input is never preprocessed (NULs and CRLFs stay
//! as-is so that spans remain byte-exact), and bad strings, bad urls and
//! unterminated comments are reported as `Error` tokens covering the
//! offending text.
//!
//! # Usage
//!
//! ```rust
//! use libcritcss::token_source::StrCssTokenSource;
//!
//! let lexer = StrCssTokenSource::new("a{color:red}");
//! for token in lexer {
//!     println!("{:?}", token.kind);
//! }
//! // Output:
//! // Ident(Borrowed("a"))
//! // CurlyBraceOpen
//! // Ident(Borrowed("color"))
//! // Colon
//! // Ident(Borrowed("red"))
//! // CurlyBraceClose
//! // Eof
//! ```

use crate::smallvec;
use crate::token::CssToken;
use crate::token::CssTokenKind;
use crate::CssErrorNote;
use crate::CssSourceSpan;
use crate::SourcePosition;
use memchr::memmem;
use std::borrow::Cow;
use std::path::Path;

/// A [`CssTokenSource`](crate::token_source::CssTokenSource) that lexes
/// from a `&str` input.
///
/// See module documentation for details.
pub struct StrCssTokenSource<'src> {
    /// The full source text being lexed.
    source: &'src str,

    /// Current byte offset from the start of `source`.
    ///
    /// The remaining text to lex is `&source[curr_byte_offset..]`.
    curr_byte_offset: usize,

    /// Current 0-based line number.
    curr_line: usize,

    /// Current UTF-8 character column (0-based).
    curr_col_utf8: usize,

    /// Current UTF-16 code unit column (0-based).
    curr_col_utf16: usize,

    /// Whether the previous character was `\r`.
    ///
    /// Used to handle `\r\n` as a single newline.
    last_char_was_cr: bool,

    /// Whether the EOF token has been emitted.
    finished: bool,

    /// Optional file path for error messages and spans.
    file_path: Option<&'src Path>,
}

impl<'src> StrCssTokenSource<'src> {
    /// Creates a new token source from a string slice.
    ///
    /// A leading byte order mark is skipped; it stays part of the root
    /// span but never reaches a token.
    pub fn new(source: &'src str) -> Self {
        let bom_len = if source.starts_with('\u{FEFF}') {
            '\u{FEFF}'.len_utf8()
        } else {
            0
        };
        Self {
            source,
            curr_byte_offset: bom_len,
            curr_line: 0,
            curr_col_utf8: 0,
            curr_col_utf16: 0,
            last_char_was_cr: false,
            finished: false,
            file_path: None,
        }
    }

    /// Creates a new token source with an associated file path.
    ///
    /// The file path is included in token spans for error reporting.
    pub fn with_file_path(source: &'src str, path: &'src Path) -> Self {
        Self {
            file_path: Some(path),
            ..Self::new(source)
        }
    }

    // =========================================================================
    // Position and scanning helpers
    // =========================================================================

    /// Returns the remaining source text to be lexed.
    fn remaining(&self) -> &'src str {
        &self.source[self.curr_byte_offset..]
    }

    /// Returns the current source position.
    fn curr_position(&self) -> SourcePosition {
        SourcePosition::new(
            self.curr_line,
            self.curr_col_utf8,
            self.curr_col_utf16,
            self.curr_byte_offset,
        )
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.peek_char_nth(0)
    }

    /// Peeks at the nth character ahead without consuming.
    fn peek_char_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consumes the next character and updates position tracking.
    ///
    /// `\n`, `\r`, `\r\n` and form feed all count as a single newline.
    fn consume(&mut self) -> Option<char> {
        let ch = self.peek_char()?;

        if ch == '\n' {
            if self.last_char_was_cr {
                self.last_char_was_cr = false;
            } else {
                self.curr_line += 1;
                self.curr_col_utf8 = 0;
                self.curr_col_utf16 = 0;
            }
        } else if ch == '\r' || ch == '\u{000C}' {
            self.curr_line += 1;
            self.curr_col_utf8 = 0;
            self.curr_col_utf16 = 0;
            self.last_char_was_cr = ch == '\r';
        } else {
            self.curr_col_utf8 += 1;
            self.curr_col_utf16 += ch.len_utf16();
            self.last_char_was_cr = false;
        }

        self.curr_byte_offset += ch.len_utf8();
        Some(ch)
    }

    /// Consumes characters until the byte offset reaches `end`.
    fn consume_to(&mut self, end: usize) {
        while self.curr_byte_offset < end {
            if self.consume().is_none() {
                break;
            }
        }
    }

    /// Creates a `CssSourceSpan` from a start position to the current
    /// position.
    fn make_span(&self, start: SourcePosition) -> CssSourceSpan {
        let end = self.curr_position();
        if let Some(path) = self.file_path {
            CssSourceSpan::with_file(start, end, path.to_path_buf())
        } else {
            CssSourceSpan::new(start, end)
        }
    }

    /// Creates a token spanning from `start` to the current position.
    fn make_token(
        &self,
        kind: CssTokenKind<'src>,
        start: SourcePosition,
    ) -> CssToken<'src> {
        CssToken::new(kind, self.make_span(start))
    }

    /// Returns the source text from `start` to the current position.
    fn text_since(&self, start: &SourcePosition) -> &'src str {
        &self.source[start.byte_offset()..self.curr_byte_offset]
    }

    // =========================================================================
    // Lexer main loop
    // =========================================================================

    fn next_token(&mut self) -> CssToken<'src> {
        let start = self.curr_position();

        let Some(ch) = self.peek_char() else {
            return self.make_token(CssTokenKind::Eof, start);
        };

        match ch {
            c if is_whitespace(c) => {
                while self.peek_char().is_some_and(is_whitespace) {
                    self.consume();
                }
                self.make_token(CssTokenKind::Whitespace, start)
            },

            '"' | '\'' => self.lex_string(start, ch),

            '#' => {
                let next = self.peek_char_nth(1);
                let next2 = self.peek_char_nth(2);
                if next.is_some_and(is_name_char) || is_valid_escape(next, next2) {
                    self.consume();
                    let name_start = self.curr_byte_offset;
                    self.consume_name();
                    let name = &self.source[name_start..self.curr_byte_offset];
                    self.make_token(CssTokenKind::Hash(Cow::Borrowed(name)), start)
                } else {
                    self.lex_delim(start)
                }
            },

            '(' => self.lex_punctuator(start, CssTokenKind::ParenOpen),
            ')' => self.lex_punctuator(start, CssTokenKind::ParenClose),
            '[' => self.lex_punctuator(start, CssTokenKind::SquareBracketOpen),
            ']' => self.lex_punctuator(start, CssTokenKind::SquareBracketClose),
            '{' => self.lex_punctuator(start, CssTokenKind::CurlyBraceOpen),
            '}' => self.lex_punctuator(start, CssTokenKind::CurlyBraceClose),
            ',' => self.lex_punctuator(start, CssTokenKind::Comma),
            ':' => self.lex_punctuator(start, CssTokenKind::Colon),
            ';' => self.lex_punctuator(start, CssTokenKind::Semicolon),

            '+' | '.' => {
                if self.starts_number() {
                    self.lex_numeric(start)
                } else {
                    self.lex_delim(start)
                }
            },

            '-' => {
                if self.starts_number() {
                    self.lex_numeric(start)
                } else if self.remaining().starts_with("-->") {
                    self.consume();
                    self.consume();
                    self.consume();
                    self.make_token(CssTokenKind::Cdc, start)
                } else if self.starts_ident() {
                    self.lex_ident_like(start)
                } else {
                    self.lex_delim(start)
                }
            },

            '<' => {
                if self.remaining().starts_with("<!--") {
                    for _ in 0..4 {
                        self.consume();
                    }
                    self.make_token(CssTokenKind::Cdo, start)
                } else {
                    self.lex_delim(start)
                }
            },

            '@' => {
                let c1 = self.peek_char_nth(1);
                let c2 = self.peek_char_nth(2);
                let c3 = self.peek_char_nth(3);
                if would_start_ident(c1, c2, c3) {
                    self.consume();
                    let name_start = self.curr_byte_offset;
                    self.consume_name();
                    let name = &self.source[name_start..self.curr_byte_offset];
                    self.make_token(CssTokenKind::AtKeyword(Cow::Borrowed(name)), start)
                } else {
                    self.lex_delim(start)
                }
            },

            '\\' => {
                if is_valid_escape(Some('\\'), self.peek_char_nth(1)) {
                    self.lex_ident_like(start)
                } else {
                    self.consume();
                    self.make_token(
                        CssTokenKind::Error {
                            message: "Invalid escape: `\\` followed by a newline".to_string(),
                            error_notes: smallvec![CssErrorNote::help(
                                "Outside of strings, `\\` must escape another character",
                            )],
                        },
                        start,
                    )
                }
            },

            '/' => {
                if self.peek_char_nth(1) == Some('*') {
                    self.lex_comment(start)
                } else {
                    self.lex_delim(start)
                }
            },

            c if c.is_ascii_digit() => self.lex_numeric(start),

            c if is_name_start(c) => self.lex_ident_like(start),

            _ => self.lex_delim(start),
        }
    }

    fn lex_punctuator(
        &mut self,
        start: SourcePosition,
        kind: CssTokenKind<'src>,
    ) -> CssToken<'src> {
        self.consume();
        self.make_token(kind, start)
    }

    fn lex_delim(&mut self, start: SourcePosition) -> CssToken<'src> {
        match self.consume() {
            Some(c) => self.make_token(CssTokenKind::Delim(c), start),
            None => self.make_token(CssTokenKind::Eof, start),
        }
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Lexes a `/* ... */` comment.
    ///
    /// The closing `*/` is located with `memmem`; position tracking then
    /// advances through the comment body.
    fn lex_comment(&mut self, start: SourcePosition) -> CssToken<'src> {
        let body_start = self.curr_byte_offset + 2;
        let body = &self.source.as_bytes()[body_start..];

        match memmem::find(body, b"*/") {
            Some(rel_end) => {
                self.consume_to(body_start + rel_end + 2);
                let text = self.text_since(&start);
                self.make_token(CssTokenKind::Comment(Cow::Borrowed(text)), start)
            },
            None => {
                self.consume_to(self.source.len());
                self.make_token(
                    CssTokenKind::Error {
                        message: "Unterminated comment".to_string(),
                        error_notes: smallvec![CssErrorNote::help(
                            "Close the comment with `*/`",
                        )],
                    },
                    start,
                )
            },
        }
    }

    // =========================================================================
    // Strings
    // =========================================================================

    /// Lexes a quoted string (CSS Syntax 4.3.5).
    ///
    /// An unescaped newline ends the string as a "bad string": the newline
    /// itself is not consumed.
    fn lex_string(&mut self, start: SourcePosition, quote: char) -> CssToken<'src> {
        self.consume();

        loop {
            match self.peek_char() {
                None => {
                    return self.make_token(
                        CssTokenKind::Error {
                            message: "Unterminated string".to_string(),
                            error_notes: smallvec![CssErrorNote::help(format!(
                                "Close the string with `{quote}`",
                            ))],
                        },
                        start,
                    );
                },
                Some(c) if c == quote => {
                    self.consume();
                    let text = self.text_since(&start);
                    return self.make_token(
                        CssTokenKind::QuotedString(Cow::Borrowed(text)),
                        start,
                    );
                },
                Some('\n') | Some('\r') | Some('\u{000C}') => {
                    return self.make_token(
                        CssTokenKind::Error {
                            message: "Unterminated string: newline in string".to_string(),
                            error_notes: smallvec![CssErrorNote::help(
                                "Escape the newline with `\\` to continue the string on the next line",
                            )],
                        },
                        start,
                    );
                },
                Some('\\') => {
                    self.consume();
                    if self.peek_char() == Some('\r') && self.peek_char_nth(1) == Some('\n') {
                        self.consume();
                    }
                    self.consume();
                },
                Some(_) => {
                    self.consume();
                },
            }
        }
    }

    // =========================================================================
    // Numbers
    // =========================================================================

    /// Returns `true` if the next three characters would start a number.
    fn starts_number(&self) -> bool {
        let c1 = self.peek_char();
        let c2 = self.peek_char_nth(1);
        let c3 = self.peek_char_nth(2);
        match c1 {
            Some('+') | Some('-') => {
                c2.is_some_and(|c| c.is_ascii_digit())
                    || (c2 == Some('.') && c3.is_some_and(|c| c.is_ascii_digit()))
            },
            Some('.') => c2.is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    /// Returns `true` if the next three characters would start an ident.
    fn starts_ident(&self) -> bool {
        would_start_ident(self.peek_char(), self.peek_char_nth(1), self.peek_char_nth(2))
    }

    /// Lexes a number, percentage or dimension.
    fn lex_numeric(&mut self, start: SourcePosition) -> CssToken<'src> {
        if matches!(self.peek_char(), Some('+') | Some('-')) {
            self.consume();
        }
        self.consume_digits();
        if self.peek_char() == Some('.')
            && self.peek_char_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.consume();
            self.consume_digits();
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let c1 = self.peek_char_nth(1);
            let c2 = self.peek_char_nth(2);
            let has_exponent = c1.is_some_and(|c| c.is_ascii_digit())
                || (matches!(c1, Some('+') | Some('-'))
                    && c2.is_some_and(|c| c.is_ascii_digit()));
            if has_exponent {
                self.consume();
                if matches!(self.peek_char(), Some('+') | Some('-')) {
                    self.consume();
                }
                self.consume_digits();
            }
        }

        if self.starts_ident() {
            self.consume_name();
        } else if self.peek_char() == Some('%') {
            self.consume();
        }

        let text = self.text_since(&start);
        self.make_token(CssTokenKind::Numeric(Cow::Borrowed(text)), start)
    }

    fn consume_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.consume();
        }
    }

    // =========================================================================
    // Names, idents, functions and urls
    // =========================================================================

    /// Consumes a name (CSS Syntax 4.3.12), including escapes.
    fn consume_name(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if is_name_char(c) => {
                    self.consume();
                },
                Some('\\') if is_valid_escape(Some('\\'), self.peek_char_nth(1)) => {
                    self.consume_escape();
                },
                _ => break,
            }
        }
    }

    /// Consumes an escape sequence starting at a `\`.
    ///
    /// Hex escapes take up to six hex digits plus one optional trailing
    /// whitespace character.
    fn consume_escape(&mut self) {
        self.consume();
        if self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
            let mut count = 0;
            while count < 6 && self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.consume();
                count += 1;
            }
            if self.peek_char() == Some('\r') && self.peek_char_nth(1) == Some('\n') {
                self.consume();
                self.consume();
            } else if self.peek_char().is_some_and(is_whitespace) {
                self.consume();
            }
        } else {
            self.consume();
        }
    }

    /// Lexes an ident, function or url token.
    fn lex_ident_like(&mut self, start: SourcePosition) -> CssToken<'src> {
        self.consume_name();
        let name = self.text_since(&start);

        if self.peek_char() != Some('(') {
            return self.make_token(CssTokenKind::Ident(Cow::Borrowed(name)), start);
        }

        self.consume();
        if !name.eq_ignore_ascii_case("url") {
            return self.make_token(CssTokenKind::Function(Cow::Borrowed(name)), start);
        }

        // `url(` followed (after optional whitespace) by a quote is an
        // ordinary function whose argument is a string.
        let first_non_ws = self
            .remaining()
            .chars()
            .find(|c| !is_whitespace(*c));
        if matches!(first_non_ws, Some('"') | Some('\'')) {
            return self.make_token(CssTokenKind::Function(Cow::Borrowed(name)), start);
        }

        self.lex_url(start)
    }

    /// Lexes the remainder of an unquoted `url(...)` (CSS Syntax 4.3.6).
    fn lex_url(&mut self, start: SourcePosition) -> CssToken<'src> {
        while self.peek_char().is_some_and(is_whitespace) {
            self.consume();
        }
        let value_start = self.curr_byte_offset;

        loop {
            match self.peek_char() {
                None => {
                    return self.make_token(
                        CssTokenKind::Error {
                            message: "Unterminated `url(`".to_string(),
                            error_notes: smallvec![CssErrorNote::help(
                                "Close the url with `)`",
                            )],
                        },
                        start,
                    );
                },
                Some(')') => {
                    let value = &self.source[value_start..self.curr_byte_offset];
                    self.consume();
                    return self.make_token(
                        CssTokenKind::Url(Cow::Borrowed(value)),
                        start,
                    );
                },
                Some(c) if is_whitespace(c) => {
                    let value_end = self.curr_byte_offset;
                    while self.peek_char().is_some_and(is_whitespace) {
                        self.consume();
                    }
                    match self.peek_char() {
                        Some(')') => {
                            self.consume();
                            let value = &self.source[value_start..value_end];
                            return self.make_token(
                                CssTokenKind::Url(Cow::Borrowed(value)),
                                start,
                            );
                        },
                        None => continue,
                        Some(_) => {
                            return self.lex_bad_url(
                                start,
                                "Unexpected whitespace inside unquoted `url(`",
                            );
                        },
                    }
                },
                Some('"') | Some('\'') | Some('(') => {
                    return self.lex_bad_url(start, "Unexpected character inside unquoted `url(`");
                },
                Some(c) if is_non_printable(c) => {
                    return self.lex_bad_url(
                        start,
                        "Unexpected non-printable character inside `url(`",
                    );
                },
                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek_char_nth(1)) {
                        self.consume_escape();
                    } else {
                        return self.lex_bad_url(start, "Invalid escape inside `url(`");
                    }
                },
                Some(_) => {
                    self.consume();
                },
            }
        }
    }

    /// Consumes the remnants of a bad url up to and including the next
    /// `)` and produces an error token covering the whole url.
    fn lex_bad_url(&mut self, start: SourcePosition, message: &str) -> CssToken<'src> {
        loop {
            match self.peek_char() {
                None => break,
                Some(')') => {
                    self.consume();
                    break;
                },
                Some('\\') if is_valid_escape(Some('\\'), self.peek_char_nth(1)) => {
                    self.consume_escape();
                },
                Some(_) => {
                    self.consume();
                },
            }
        }
        self.make_token(
            CssTokenKind::Error {
                message: message.to_string(),
                error_notes: smallvec![CssErrorNote::help(
                    "Quote the url: `url(\"...\")`",
                )],
            },
            start,
        )
    }
}

// =============================================================================
// Iterator implementation
// =============================================================================

impl<'src> Iterator for StrCssTokenSource<'src> {
    type Item = CssToken<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.next_token();

        if matches!(token.kind, CssTokenKind::Eof) {
            self.finished = true;
        }

        Some(token)
    }
}

// =============================================================================
// Helper functions
// =============================================================================

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
}

/// Returns `true` if `ch` can start a CSS name.
fn is_name_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic() || !ch.is_ascii()
}

/// Returns `true` if `ch` can continue a CSS name.
fn is_name_char(ch: char) -> bool {
    is_name_start(ch) || ch == '-' || ch.is_ascii_digit()
}

fn is_non_printable(ch: char) -> bool {
    matches!(ch, '\u{0000}'..='\u{0008}' | '\u{000B}' | '\u{000E}'..='\u{001F}' | '\u{007F}')
}

/// Returns `true` if the two characters form a valid escape.
fn is_valid_escape(c1: Option<char>, c2: Option<char>) -> bool {
    c1 == Some('\\') && c2.is_some_and(|c| !matches!(c, '\n' | '\r' | '\u{000C}'))
}

/// Returns `true` if the three characters would start an identifier
/// (CSS Syntax 4.3.9).
fn would_start_ident(c1: Option<char>, c2: Option<char>, c3: Option<char>) -> bool {
    match c1 {
        Some('-') => {
            c2.is_some_and(|c| is_name_start(c) || c == '-') || is_valid_escape(c2, c3)
        },
        Some('\\') => is_valid_escape(c1, c2),
        Some(c) => is_name_start(c),
        None => false,
    }
}
