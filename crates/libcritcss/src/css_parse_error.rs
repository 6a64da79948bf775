use crate::CssErrorNote;
use crate::CssErrorNoteKind;
use crate::CssErrorNotes;
use crate::CssParseErrorKind;
use crate::CssSourceSpan;

/// A non-fatal parse diagnostic with location information and contextual
/// notes.
///
/// Diagnostics are collected on the [`StyleAst`](crate::StyleAst) while
/// parsing continues; they never prevent a tree from being produced.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", self.format_oneline())]
pub struct CssParseError {
    /// Human-readable primary error message.
    message: String,

    /// The primary span where the error was detected.
    span: CssSourceSpan,

    /// Categorized error kind for programmatic handling.
    kind: CssParseErrorKind,

    /// Additional notes providing context and related locations.
    notes: CssErrorNotes,
}

impl CssParseError {
    /// Creates a new parse error with no notes.
    pub fn new(
        message: impl Into<String>,
        span: CssSourceSpan,
        kind: CssParseErrorKind,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            notes: CssErrorNotes::new(),
        }
    }

    /// Creates a new parse error with notes.
    pub fn with_notes(
        message: impl Into<String>,
        span: CssSourceSpan,
        kind: CssParseErrorKind,
        notes: CssErrorNotes,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            notes,
        }
    }

    /// Creates a parse error from a lexer error token, preserving the
    /// lexer's message and notes.
    pub fn from_lexer_error(
        message: impl Into<String>,
        span: CssSourceSpan,
        lexer_notes: CssErrorNotes,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            kind: CssParseErrorKind::LexerError,
            notes: lexer_notes,
        }
    }

    /// Returns the human-readable error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the primary span where the error was detected.
    pub fn span(&self) -> &CssSourceSpan {
        &self.span
    }

    /// Returns the categorized error kind.
    pub fn kind(&self) -> &CssParseErrorKind {
        &self.kind
    }

    /// Returns the additional notes for this error.
    pub fn notes(&self) -> &CssErrorNotes {
        &self.notes
    }

    /// Adds a general note without a span.
    pub fn add_note(&mut self, message: impl Into<String>) {
        self.notes.push(CssErrorNote::general(message));
    }

    /// Adds a general note with a span (pointing to a related location).
    pub fn add_note_with_span(&mut self, message: impl Into<String>, span: CssSourceSpan) {
        self.notes
            .push(CssErrorNote::general_with_span(message, span));
    }

    /// Adds a help note without a span.
    pub fn add_help(&mut self, message: impl Into<String>) {
        self.notes.push(CssErrorNote::help(message));
    }

    /// Formats this error as a diagnostic string for CLI output.
    ///
    /// Produces output like:
    /// ```text
    /// error: Expected `:` after property name
    ///   --> site.css:5:12
    ///    |
    ///  5 |     color red;
    ///    |           ^^^
    ///    |
    ///    = help: Declarations are written as `property: value`
    /// ```
    pub fn format_detailed(&self, source: Option<&str>) -> String {
        let mut output = String::new();

        output.push_str("error: ");
        output.push_str(&self.message);
        output.push('\n');

        let line = self.span.start_inclusive.line() + 1;
        let column = self.span.start_inclusive.col_utf8() + 1;
        output.push_str(&format!("  --> {}:{line}:{column}\n", self.file_name()));

        if let Some(src) = source
            && let Some(snippet) = self.format_source_snippet(src)
        {
            output.push_str(&snippet);
        }

        for note in &self.notes {
            let prefix = match note.kind {
                CssErrorNoteKind::General => "note",
                CssErrorNoteKind::Help => "help",
            };
            output.push_str(&format!("   = {prefix}: {}\n", note.message));

            if let (Some(note_span), Some(src)) = (&note.span, source)
                && let Some(snippet) = Self::format_note_snippet(src, note_span)
            {
                output.push_str(&snippet);
            }
        }

        output
    }

    /// Formats this error as a single-line summary.
    ///
    /// ```text
    /// site.css:5:12: error: Expected `:` after property name
    /// ```
    pub fn format_oneline(&self) -> String {
        let line = self.span.start_inclusive.line() + 1;
        let column = self.span.start_inclusive.col_utf8() + 1;
        format!("{}:{line}:{column}: error: {}", self.file_name(), self.message)
    }

    fn file_name(&self) -> String {
        self.span
            .file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<input>".to_string())
    }

    fn format_source_snippet(&self, source: &str) -> Option<String> {
        let line_num = self.span.start_inclusive.line();
        let line_content = source.lines().nth(line_num)?;
        let display_line_num = line_num + 1;
        let line_num_width = display_line_num.to_string().len().max(2);

        let mut output = String::new();
        output.push_str(&format!("{:>width$} |\n", "", width = line_num_width));
        output.push_str(&format!(
            "{display_line_num:>line_num_width$} | {line_content}\n"
        ));

        // Multi-line spans are underlined up to the end of the first line.
        let col_start = self.span.start_inclusive.col_utf8();
        let col_end = if self.span.end_exclusive.line() == line_num {
            self.span.end_exclusive.col_utf8()
        } else {
            line_content.chars().count()
        };
        let underline_len = col_end.saturating_sub(col_start).max(1);

        output.push_str(&format!(
            "{:>width$} | {:>padding$}{}\n",
            "",
            "",
            "^".repeat(underline_len),
            width = line_num_width,
            padding = col_start
        ));

        Some(output)
    }

    fn format_note_snippet(source: &str, span: &CssSourceSpan) -> Option<String> {
        let line_num = span.start_inclusive.line();
        let line_content = source.lines().nth(line_num)?;
        let display_line_num = line_num + 1;
        let line_num_width = display_line_num.to_string().len().max(2);

        let mut output = String::new();
        output.push_str(&format!(
            "     {display_line_num:>line_num_width$} | {line_content}\n"
        ));
        output.push_str(&format!(
            "     {:>width$} | {:>padding$}-\n",
            "",
            "",
            width = line_num_width,
            padding = span.start_inclusive.col_utf8()
        ));

        Some(output)
    }
}
