use crate::ByteSpan;
use crate::SourcePosition;
use std::path::Path;
use std::path::PathBuf;

/// Where a diagnostic points in a stylesheet: line/column positions for
/// both ends of a byte range, plus the stylesheet's path when known.
///
/// Tree nodes only carry a compact [`ByteSpan`]; this richer form is
/// computed on demand, on error paths, with [`from_byte_span`].
///
/// [`from_byte_span`]: Self::from_byte_span
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CssSourceSpan {
    pub start_inclusive: SourcePosition,
    pub end_exclusive: SourcePosition,
    pub file_path: Option<PathBuf>,
}

impl CssSourceSpan {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self {
            start_inclusive: start,
            end_exclusive: end,
            file_path: None,
        }
    }

    pub fn with_file(start: SourcePosition, end: SourcePosition, file_path: PathBuf) -> Self {
        Self {
            start_inclusive: start,
            end_exclusive: end,
            file_path: Some(file_path),
        }
    }

    /// Resolves a byte range of `source` into line/column positions.
    ///
    /// Lines end at `\n`, `\r\n`, `\r` or form feed, as in the lexer.
    /// Offsets past the end of `source` are clamped to it.
    ///
    /// ```
    /// use libcritcss::ByteSpan;
    /// use libcritcss::CssSourceSpan;
    ///
    /// let span = CssSourceSpan::from_byte_span("a {\r\n  color }", ByteSpan::new(7, 12), None);
    /// assert_eq!(span.start_inclusive.line(), 1);
    /// assert_eq!(span.start_inclusive.col_utf8(), 2);
    /// assert_eq!(span.end_exclusive.col_utf8(), 7);
    /// ```
    pub fn from_byte_span(source: &str, span: ByteSpan, file_path: Option<&Path>) -> Self {
        Self {
            start_inclusive: position_at(source, span.start),
            end_exclusive: position_at(source, span.end),
            file_path: file_path.map(Path::to_path_buf),
        }
    }

    /// The byte range covered, without line/column or path information.
    pub fn byte_span(&self) -> ByteSpan {
        ByteSpan {
            start: self.start_inclusive.byte_offset() as u32,
            end: self.end_exclusive.byte_offset() as u32,
        }
    }

    /// The text of `source` this span covers, if it lies within it.
    pub fn slice<'src>(&self, source: &'src str) -> Option<&'src str> {
        self.byte_span().slice(source)
    }
}

fn position_at(source: &str, offset: u32) -> SourcePosition {
    let mut offset = (offset as usize).min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }

    let mut line = 0;
    let mut col_utf8 = 0;
    let mut col_utf16 = 0;
    let mut last_was_cr = false;
    for ch in source[..offset].chars() {
        match ch {
            '\n' if last_was_cr => {},
            '\n' | '\r' | '\u{000C}' => {
                line += 1;
                col_utf8 = 0;
                col_utf16 = 0;
            },
            _ => {
                col_utf8 += 1;
                col_utf16 += ch.len_utf16();
            },
        }
        last_was_cr = ch == '\r';
    }
    SourcePosition::new(line, col_utf8, col_utf16, offset)
}
