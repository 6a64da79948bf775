/// Compact byte-offset span. 8 bytes per node.
///
/// Represents a half-open interval `[start, end)` of byte offsets
/// into the source text of a stylesheet. Both offsets are 0-based.
///
/// `u32` offsets support stylesheets up to 4 GiB. Larger inputs are
/// rejected up front by [`StyleAst::parse`](crate::StyleAst::parse).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ByteSpan {
    /// Byte offset of the first byte of this node (inclusive).
    pub start: u32,
    /// Byte offset one past the last byte of this node (exclusive).
    pub end: u32,
}

impl ByteSpan {
    /// Creates a new `ByteSpan` from start (inclusive) and end
    /// (exclusive) byte offsets.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns a span covering both `self` and `other`.
    pub fn cover(&self, other: ByteSpan) -> ByteSpan {
        ByteSpan {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` if this span has zero length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the slice of `source` covered by this span, or `None` if
    /// the span does not fall on valid boundaries of `source`.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start as usize..self.end as usize)
    }
}
