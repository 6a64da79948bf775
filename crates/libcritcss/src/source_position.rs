/// Source position information, with dual column tracking.
///
/// This is a pure data struct with no mutation methods. The lexer is
/// responsible for computing position values as it scans input.
///
/// # Indexing Convention
///
/// **All position values are 0-based:**
/// - `line`: 0 = first line of the stylesheet
/// - `col_utf8`: UTF-8 character count within the current line
/// - `col_utf16`: UTF-16 code unit offset within the current line
/// - `byte_offset`: byte offset within the whole stylesheet
///
/// For ASCII text both columns are equal. For characters outside the
/// Basic Multilingual Plane (e.g. emoji in a `content:` string) they
/// differ: `col_utf8` advances by 1, `col_utf16` by 2.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourcePosition {
    line: usize,
    col_utf8: usize,
    col_utf16: usize,
    byte_offset: usize,
}

impl SourcePosition {
    /// Create a new SourcePosition.
    pub fn new(
        line: usize,
        col_utf8: usize,
        col_utf16: usize,
        byte_offset: usize,
    ) -> Self {
        Self {
            line,
            col_utf8,
            col_utf16,
            byte_offset,
        }
    }

    /// Returns the 0-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 0-based (UTF-8) character count within the current line.
    pub fn col_utf8(&self) -> usize {
        self.col_utf8
    }

    /// Returns the 0-based UTF-16 code unit offset within the current line.
    ///
    /// Prefer this for LSP-style consumers.
    pub fn col_utf16(&self) -> usize {
        self.col_utf16
    }

    /// Returns the 0-based byte offset from the start of the stylesheet.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }
}
