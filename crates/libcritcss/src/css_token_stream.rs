//! Streaming lexer that produces [`CssToken`]s given some
//! [`CssTokenSource`] with a bounded lookahead buffer.

use std::collections::VecDeque;

use crate::token::CssToken;
use crate::token::CssTokenKind;
use crate::token_source::CssTokenSource;

/// Streaming lexer that produces [`CssToken`]s given some
/// [`CssTokenSource`] with a bounded lookahead buffer.
///
/// This structure accepts any [`CssTokenSource`] and provides lookahead
/// capabilities while maintaining efficient streaming behavior. It
/// centralizes buffering, peeking, and lookahead logic.
///
/// Tokens are stored in a [`VecDeque`] ring buffer. Unconsumed tokens are
/// buffered at the back; `consume()` pops from the front and returns the
/// owned token.
pub struct CssTokenStream<'src, TTokenSource: CssTokenSource<'src>> {
    token_source: TTokenSource,
    buffer: VecDeque<CssToken<'src>>,
}

impl<'src, TTokenSource: CssTokenSource<'src>> CssTokenStream<'src, TTokenSource> {
    /// Advance to the next token and return it as an owned value.
    ///
    /// Returns `None` if the stream is exhausted.
    pub fn consume(&mut self) -> Option<CssToken<'src>> {
        self.ensure_buffer_has(1);
        self.buffer.pop_front()
    }

    /// Returns the number of tokens currently buffered.
    pub fn current_buffer_len(&self) -> usize {
        self.buffer.len()
    }

    fn ensure_buffer_has(&mut self, count: usize) {
        while self.buffer.len() < count {
            if let Some(token) = self.token_source.next() {
                self.buffer.push_back(token);
            } else {
                break;
            }
        }
    }

    /// Returns `true` once the next token is `Eof` (or the source is
    /// exhausted).
    pub fn is_at_end(&mut self) -> bool {
        match self.peek() {
            None => true,
            Some(token) => matches!(token.kind, CssTokenKind::Eof),
        }
    }

    pub fn new(token_source: TTokenSource) -> Self {
        Self {
            token_source,
            buffer: VecDeque::new(),
        }
    }

    /// Peek at the next token without consuming it.
    #[inline]
    pub fn peek(&mut self) -> Option<&CssToken<'src>> {
        self.peek_nth(0)
    }

    /// Peek at the nth token ahead (0-indexed from the next token).
    pub fn peek_nth(&mut self, n: usize) -> Option<&CssToken<'src>> {
        self.ensure_buffer_has(n + 1);
        self.buffer.get(n)
    }
}
