/// Fatal errors that prevent a [`StyleAst`](crate::StyleAst) from being
/// built at all.
///
/// Malformed CSS is never fatal: it is reported through
/// [`CssParseError`](crate::CssParseError) diagnostics attached to the
/// resulting `StyleAst`. These errors are reserved for input that cannot
/// be tokenized in the first place.
#[derive(Debug, thiserror::Error)]
pub enum StyleAstError {
    /// The input bytes are not valid UTF-8.
    #[error("stylesheet is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The input is larger than the byte spans stored on tree nodes can
    /// address.
    #[error("stylesheet is too large to parse ({len} bytes; maximum is {max})", max = u32::MAX)]
    SourceTooLarge {
        len: usize,
    },
}
