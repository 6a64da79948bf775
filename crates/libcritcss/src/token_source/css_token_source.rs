use crate::token::CssToken;

/// Marker trait for [`CssToken`] lexers (iterators that generate
/// [`CssToken`]).
///
/// Implementors define an [`Iterator`] that produces tokens one at a time.
/// All lookahead, buffering, and peeking is handled by `CssTokenStream`.
///
/// Lexers are responsible for:
/// - Emitting whitespace and comments as regular tokens
/// - Emitting [`CssTokenKind::Error`](crate::token::CssTokenKind::Error)
///   for lexer errors (enables error recovery)
/// - Emitting a final token with
///   [`CssTokenKind::Eof`](crate::token::CssTokenKind::Eof)
///
/// Every byte of the input must be covered by exactly one token so that
/// the parser can reconstruct byte-exact spans.
pub trait CssTokenSource<'src>: Iterator<Item = CssToken<'src>> {}

impl<'src, T> CssTokenSource<'src> for T where T: Iterator<Item = CssToken<'src>> {}
