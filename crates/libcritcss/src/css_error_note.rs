use crate::CssSourceSpan;
use crate::SmallVec;

/// The kind of an error note (determines how the note is rendered).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssErrorNoteKind {
    /// General context or explanation about the error.
    ///
    /// Rendered as `= note: ...` in CLI output.
    /// Example: "Opening `{` here" (with span pointing to the opener)
    General,

    /// Actionable suggestion for fixing the error.
    ///
    /// Rendered as `= help: ...` in CLI output.
    Help,
}

/// An error note providing additional context about an error.
#[derive(Debug, Clone, PartialEq)]
pub struct CssErrorNote {
    /// The kind of note (determines rendering prefix).
    pub kind: CssErrorNoteKind,

    /// The note message.
    pub message: String,

    /// Optional span pointing to a related location.
    pub span: Option<CssSourceSpan>,
}

impl CssErrorNote {
    /// Creates a general note without a span.
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            kind: CssErrorNoteKind::General,
            message: message.into(),
            span: None,
        }
    }

    /// Creates a general note with a span.
    pub fn general_with_span(message: impl Into<String>, span: CssSourceSpan) -> Self {
        Self {
            kind: CssErrorNoteKind::General,
            message: message.into(),
            span: Some(span),
        }
    }

    /// Creates a help note without a span.
    pub fn help(message: impl Into<String>) -> Self {
        Self {
            kind: CssErrorNoteKind::Help,
            message: message.into(),
            span: None,
        }
    }
}

/// Type alias for error notes. Uses SmallVec since most errors have 0-2
/// notes.
pub type CssErrorNotes = SmallVec<[CssErrorNote; 2]>;
