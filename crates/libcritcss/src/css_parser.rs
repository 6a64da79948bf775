//! Recursive descent parser for CSS stylesheets.
//!
//! This module provides [`CssParser`], a generic parser that works with any
//! token source implementing [`CssTokenSource`]. It builds a [`StyleTree`]
//! in which every node records the byte span it was parsed from.
//!
//! # Architecture
//!
//! The parser follows the "consume a list of rules" / "consume a list of
//! declarations" algorithms of CSS Syntax Level 3. Blocks of style rules
//! and of descriptor at-rules (`@font-face`, `@page`, ...) are parsed as
//! declaration lists; blocks of every other at-rule (`@media`,
//! `@supports`, `@keyframes`, unknown at-rules) are parsed as rule lists.
//!
//! # Error Recovery
//!
//! CSS is parsed forgivingly. When a construct can't be parsed:
//! 1. An error is recorded via `record_error()`
//! 2. The offending source text is kept in the tree as an opaque `Raw`
//!    node, so that serialization stays byte-faithful
//! 3. Parsing resumes at the next `;` or `}` at the same nesting level
//!
//! Parsing therefore never fails outright; errors are returned alongside
//! the tree in a [`ParseResult`].

use crate::ast::BlockContents;
use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::ast::collapse_whitespace;
use crate::ast::normalize_selector;
use crate::token::CssToken;
use crate::token::CssTokenKind;
use crate::token_source::CssTokenSource;
use crate::token_source::StrCssTokenSource;
use crate::ByteSpan;
use crate::CssParseError;
use crate::CssParseErrorKind;
use crate::CssSourceSpan;
use crate::CssTokenStream;
use crate::ParseResult;
use crate::SourcePosition;
use smallvec::SmallVec;
use std::path::Path;
use std::path::PathBuf;

// =============================================================================
// Delimiter tracking for error recovery
// =============================================================================

/// Context in which a delimiter was opened, for error messages.
#[derive(Debug, Clone, Copy)]
enum DelimiterContext {
    /// `a { ... }`
    RuleBlock,
    /// `@media print { ... }`
    AtRuleBlock,
    /// `calc( ... )`
    FunctionArguments,
    /// `( ... )` in a value or prelude
    ParenthesizedGroup,
    /// `[ ... ]` (attribute selectors, grid line names)
    SquareBracketGroup,
    /// `{ ... }` in a value or prelude
    CurlyBraceGroup,
}

impl DelimiterContext {
    /// Returns a human-readable description of this context.
    fn description(&self) -> &'static str {
        match self {
            DelimiterContext::RuleBlock => "rule block",
            DelimiterContext::AtRuleBlock => "at-rule block",
            DelimiterContext::FunctionArguments => "function arguments",
            DelimiterContext::ParenthesizedGroup => "parenthesized group",
            DelimiterContext::SquareBracketGroup => "bracketed group",
            DelimiterContext::CurlyBraceGroup => "braced group",
        }
    }
}

/// Tracks an open delimiter for error recovery.
#[derive(Debug, Clone)]
struct OpenDelimiter {
    /// Where the delimiter was opened
    span: CssSourceSpan,
    /// The parsing context (also implicitly identifies the delimiter type)
    context: DelimiterContext,
}

/// Copyable summary of the next token, used to branch without holding a
/// borrow of the token stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Peeked {
    AtKeyword,
    Cdc,
    Cdo,
    Colon,
    Comment,
    CurlyClose,
    CurlyOpen,
    Eof,
    Error,
    Ident,
    Other,
    Semicolon,
    Whitespace,
}

/// Where a qualified rule is being parsed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum RuleContext {
    TopLevel,
    /// Inside the rule list of a grouping at-rule.
    NestedInRules,
    /// Inside a declaration block (CSS nesting).
    NestedInDeclarations,
}

// =============================================================================
// Main parser struct
// =============================================================================

/// A recursive descent parser for CSS stylesheets.
///
/// # Usage
///
/// ```
/// use libcritcss::ast::NodeKind;
/// use libcritcss::CssParser;
///
/// let source = "a, b > c { color: red }";
/// let result = CssParser::new(source).parse_stylesheet();
/// assert!(result.is_ok());
///
/// let tree = result.valid_ast().unwrap();
/// let rule = tree.rule_ids().next().unwrap();
/// let selectors: Vec<_> = tree
///     .selectors(rule)
///     .into_iter()
///     .map(|id| match tree.kind(id) {
///         NodeKind::Selector { text } => text.clone(),
///         _ => unreachable!(),
///     })
///     .collect();
/// assert_eq!(selectors, ["a", "b>c"]);
/// ```
pub struct CssParser<'src, TTokenSource: CssTokenSource<'src>> {
    /// The full source text (used to slice node text by span).
    source: &'src str,

    /// The underlying token stream with lookahead support.
    token_stream: CssTokenStream<'src, TTokenSource>,

    /// The tree being built.
    tree: StyleTree,

    /// Accumulated parse errors.
    errors: Vec<CssParseError>,

    /// Stack of open delimiters for error recovery.
    ///
    /// Uses SmallVec to avoid heap allocation for typical nesting depths.
    delimiter_stack: SmallVec<[OpenDelimiter; 8]>,

    /// Current nesting depth of blocks, functions and simple blocks.
    recursion_depth: usize,

    /// End position of the most recently consumed token, used by
    /// `eof_span()` to anchor EOF errors to the last known source
    /// location.
    last_end_position: Option<SourcePosition>,

    /// File path attached to spans computed from byte offsets.
    file_path: Option<PathBuf>,
}

impl<'src> CssParser<'src, StrCssTokenSource<'src>> {
    /// Creates a new parser from a string-like source.
    pub fn new<S: AsRef<str> + ?Sized>(source: &'src S) -> Self {
        let source = source.as_ref();
        Self::from_token_source(source, StrCssTokenSource::new(source))
    }

    /// Creates a new parser whose error spans carry `path`.
    pub fn with_file_path<S: AsRef<str> + ?Sized>(source: &'src S, path: &'src Path) -> Self {
        let source = source.as_ref();
        let mut parser =
            Self::from_token_source(source, StrCssTokenSource::with_file_path(source, path));
        parser.file_path = Some(path.to_path_buf());
        parser
    }
}

impl<'src, TTokenSource: CssTokenSource<'src>> CssParser<'src, TTokenSource> {
    /// Maximum nesting depth of blocks, functions and bracketed groups.
    ///
    /// Prevents stack overflow from adversarial inputs like `a{b{c{...` or
    /// `calc(calc(calc(...`. Deeper content is kept as opaque text.
    const MAX_RECURSION_DEPTH: usize = 128;

    /// Creates a new parser from a token source.
    ///
    /// `source` must be the text the token source lexes: spans reported by
    /// the tokens are used to slice it.
    pub fn from_token_source(source: &'src str, token_source: TTokenSource) -> Self {
        let source_len = u32::try_from(source.len()).unwrap_or(u32::MAX);
        Self {
            source,
            token_stream: CssTokenStream::new(token_source),
            tree: StyleTree::new(source_len),
            errors: Vec::new(),
            delimiter_stack: SmallVec::new(),
            recursion_depth: 0,
            last_end_position: None,
            file_path: None,
        }
    }

    /// Parses the whole input as a stylesheet.
    ///
    /// Always produces a tree; recoverable problems are reported as errors
    /// on the result.
    pub fn parse_stylesheet(mut self) -> ParseResult<StyleTree> {
        let root = self.tree.root();
        self.parse_rule_list(root, RuleContext::TopLevel);

        let Self { tree, errors, .. } = self;
        if errors.is_empty() {
            ParseResult::ok(tree)
        } else {
            ParseResult::recovered(tree, errors)
        }
    }

    // =========================================================================
    // Error recording and recovery
    // =========================================================================

    /// Records a parse error.
    fn record_error(&mut self, error: CssParseError) {
        self.errors.push(error);
    }

    /// Push an open delimiter onto the stack.
    fn push_delimiter(&mut self, span: CssSourceSpan, context: DelimiterContext) {
        self.delimiter_stack.push(OpenDelimiter { span, context });
    }

    /// Pop the most recent open delimiter.
    fn pop_delimiter(&mut self) -> Option<OpenDelimiter> {
        self.delimiter_stack.pop()
    }

    /// Records an "unclosed delimiter" error for `open`.
    fn record_unclosed(&mut self, open: Option<OpenDelimiter>, open_char: char, close_char: char) {
        let mut error = CssParseError::new(
            format!("Unclosed `{open_char}`"),
            self.eof_span(),
            CssParseErrorKind::UnclosedDelimiter {
                delimiter: open_char.to_string(),
            },
        );
        if let Some(open) = open {
            error.add_note_with_span(
                format!("`{open_char}` of this {} opened here", open.context.description()),
                open.span,
            );
        }
        error.add_help(format!("Add a closing `{close_char}`"));
        self.record_error(error);
    }

    /// Records a `}` that closes a block while a function or group is
    /// still open.
    fn record_mismatched_close(&mut self, expected: char) {
        let span = self.peek_span();
        let mut error = CssParseError::new(
            format!("Expected `{expected}` before `}}`"),
            span,
            CssParseErrorKind::MismatchedDelimiter {
                expected: expected.to_string(),
                found: "}".to_string(),
            },
        );
        if let Some(open) = self.delimiter_stack.last().cloned() {
            error.add_note_with_span(
                format!("The {} opened here", open.context.description()),
                open.span,
            );
        }
        self.record_error(error);
    }

    /// Handles a lexer error token by converting it to a parse error.
    fn handle_lexer_error(&mut self, token: &CssToken<'src>) {
        if let CssTokenKind::Error { message, error_notes } = &token.kind {
            self.record_error(CssParseError::from_lexer_error(
                message.clone(),
                token.span.clone(),
                error_notes.clone(),
            ));
        }
    }

    /// Checks recursion depth and records an error if the limit is
    /// exceeded. On success, increments the depth counter; the caller must
    /// call `exit_recursion()` when done.
    fn enter_recursion(&mut self, opener_span: &CssSourceSpan) -> Result<(), ()> {
        if self.recursion_depth >= Self::MAX_RECURSION_DEPTH {
            let mut error = CssParseError::new(
                "Maximum nesting depth exceeded",
                opener_span.clone(),
                CssParseErrorKind::InvalidSyntax,
            );
            error.add_note("The nested content is kept as unparsed text");
            self.record_error(error);
            return Err(());
        }
        self.recursion_depth += 1;
        Ok(())
    }

    /// Decrements the recursion depth counter.
    fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    /// Skips a single component value (a token, or a whole balanced
    /// block/function) and returns the end offset of the skipped text.
    fn skip_component_value(&mut self) -> u32 {
        let Some(token) = self.consume_token() else {
            return self.last_end_offset();
        };
        let end = token.span.byte_span().end;
        if token.kind.matching_close().is_none() {
            return end;
        }
        self.skip_nested_remainder().1
    }

    /// Consumes tokens up to and including the closer matching an already
    /// consumed opener.
    ///
    /// Returns `(inner_end, end)`: the offset where the closer starts (or
    /// the end of input) and the offset after the closer.
    fn skip_nested_remainder(&mut self) -> (u32, u32) {
        let mut depth = 1usize;
        let mut end = self.last_end_offset();
        loop {
            let Some(token) = self.consume_token() else {
                return (end, end);
            };
            let span = token.span.byte_span();
            if matches!(token.kind, CssTokenKind::Eof) {
                return (end, end);
            }
            if token.kind.matching_close().is_some() {
                depth += 1;
            } else if token.kind.close_char().is_some() {
                depth -= 1;
                if depth == 0 {
                    return (span.start, span.end);
                }
            }
            end = span.end;
        }
    }

    /// Appends a `Raw` node covering `start..end` to `container`.
    fn push_raw(&mut self, container: NodeId, start: u32, end: u32) {
        let span = ByteSpan::new(start, end.max(start));
        let text = self.slice(span).to_string();
        let raw = self.tree.alloc(NodeKind::Raw { text }, Some(span));
        self.tree.push_parsed_child(container, raw);
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    /// Returns a summary of the next token.
    fn peek_class(&mut self) -> Peeked {
        match self.token_stream.peek().map(|t| &t.kind) {
            None | Some(CssTokenKind::Eof) => Peeked::Eof,
            Some(CssTokenKind::AtKeyword(_)) => Peeked::AtKeyword,
            Some(CssTokenKind::Cdc) => Peeked::Cdc,
            Some(CssTokenKind::Cdo) => Peeked::Cdo,
            Some(CssTokenKind::Colon) => Peeked::Colon,
            Some(CssTokenKind::Comment(_)) => Peeked::Comment,
            Some(CssTokenKind::CurlyBraceClose) => Peeked::CurlyClose,
            Some(CssTokenKind::CurlyBraceOpen) => Peeked::CurlyOpen,
            Some(CssTokenKind::Error { .. }) => Peeked::Error,
            Some(CssTokenKind::Ident(_)) => Peeked::Ident,
            Some(CssTokenKind::Semicolon) => Peeked::Semicolon,
            Some(CssTokenKind::Whitespace) => Peeked::Whitespace,
            Some(_) => Peeked::Other,
        }
    }

    /// Returns a description of the next token for error messages.
    fn peek_description(&mut self) -> String {
        self.token_stream
            .peek()
            .map(|t| t.kind.description())
            .unwrap_or_else(|| "end of input".to_string())
    }

    /// Returns the span of the next token, or the EOF span.
    fn peek_span(&mut self) -> CssSourceSpan {
        match self.token_stream.peek() {
            Some(token) => token.span.clone(),
            None => self.eof_span(),
        }
    }

    /// Consumes the next token from the stream and tracks its end
    /// position for EOF error reporting.
    fn consume_token(&mut self) -> Option<CssToken<'src>> {
        let token = self.token_stream.consume();
        if let Some(ref t) = token {
            self.last_end_position = Some(t.span.end_exclusive.clone());
        }
        token
    }

    /// Consumes whitespace and comment tokens.
    fn skip_whitespace_and_comments(&mut self) {
        while matches!(self.peek_class(), Peeked::Whitespace | Peeked::Comment) {
            self.consume_token();
        }
    }

    /// Returns a span for EOF errors, anchored to the end of the last
    /// consumed token if available.
    fn eof_span(&self) -> CssSourceSpan {
        let pos = self
            .last_end_position
            .clone()
            .unwrap_or_else(|| SourcePosition::new(0, 0, 0, 0));
        self.make_span(pos.clone(), pos)
    }

    fn make_span(&self, start: SourcePosition, end: SourcePosition) -> CssSourceSpan {
        match &self.file_path {
            Some(path) => CssSourceSpan::with_file(start, end, path.clone()),
            None => CssSourceSpan::new(start, end),
        }
    }

    /// Builds a `CssSourceSpan` for a byte range of the source.
    ///
    /// Line and column information is recomputed by scanning the source;
    /// this is only used on error paths.
    fn span_for(&self, span: ByteSpan) -> CssSourceSpan {
        CssSourceSpan::from_byte_span(self.source, span, self.file_path.as_deref())
    }

    fn last_end_offset(&self) -> u32 {
        self.last_end_position
            .as_ref()
            .map_or(0, |pos| pos.byte_offset() as u32)
    }

    /// Returns the source text covered by `span`.
    fn slice(&self, span: ByteSpan) -> &'src str {
        span.slice(self.source).unwrap_or("")
    }

    fn end_of(&self, id: NodeId) -> u32 {
        self.tree.span(id).map_or(0, |span| span.end)
    }

    fn start_of(&self, id: NodeId) -> u32 {
        self.tree.span(id).map_or(0, |span| span.start)
    }

    /// Returns a span covering the first through last node of `ids`.
    fn cover(&self, ids: &[NodeId]) -> Option<ByteSpan> {
        let first = ids.first()?;
        let last = ids.last()?;
        Some(ByteSpan::new(self.start_of(*first), self.end_of(*last)))
    }

    /// Drops leading and trailing `Whitespace` nodes from `ids`.
    fn trim_whitespace(&self, ids: &[NodeId]) -> Vec<NodeId> {
        let is_ws = |id: &NodeId| self.tree.kind(*id).is_whitespace();
        let start = ids.iter().position(|id| !is_ws(id)).unwrap_or(ids.len());
        let end = ids.iter().rposition(|id| !is_ws(id)).map_or(start, |i| i + 1);
        ids[start..end].to_vec()
    }

    /// Splits `ids` at `Comma` nodes, trimming whitespace from each group.
    fn split_at_commas(&self, ids: &[NodeId]) -> Vec<Vec<NodeId>> {
        ids.split(|id| matches!(self.tree.kind(*id), NodeKind::Comma))
            .map(|group| self.trim_whitespace(group))
            .collect()
    }

    // =========================================================================
    // Rule lists
    // =========================================================================

    /// Parses rules, at-rules and comments into `container` until EOF (or a
    /// closing `}` when nested).
    fn parse_rule_list(&mut self, container: NodeId, context: RuleContext) {
        loop {
            match self.peek_class() {
                Peeked::Eof => break,
                Peeked::Whitespace | Peeked::Cdo | Peeked::Cdc => {
                    self.consume_token();
                },
                Peeked::Comment => self.parse_comment(container),
                Peeked::CurlyClose => {
                    if context != RuleContext::TopLevel {
                        break;
                    }
                    let span = self.peek_span();
                    self.consume_token();
                    let mut error = CssParseError::new(
                        "Unexpected `}` with no matching `{`",
                        span,
                        CssParseErrorKind::UnexpectedToken {
                            expected: vec![],
                            found: "}".to_string(),
                        },
                    );
                    error.add_help("Remove the stray `}`");
                    self.record_error(error);
                },
                Peeked::AtKeyword => self.parse_at_rule(container),
                Peeked::Error => {
                    if let Some(token) = self.consume_token() {
                        self.handle_lexer_error(&token);
                        let span = token.span.byte_span();
                        self.push_raw(container, span.start, span.end);
                    }
                },
                _ => self.parse_qualified_rule(container, context),
            }
        }
    }

    fn parse_comment(&mut self, container: NodeId) {
        let Some(token) = self.consume_token() else {
            return;
        };
        if let CssTokenKind::Comment(text) = token.kind {
            let comment = self.tree.alloc(
                NodeKind::Comment { text: text.into_owned() },
                Some(token.span.byte_span()),
            );
            self.tree.push_parsed_child(container, comment);
        }
    }

    /// Parses `@name prelude;` or `@name prelude { ... }`.
    fn parse_at_rule(&mut self, container: NodeId) {
        let Some(at_token) = self.consume_token() else {
            return;
        };
        let at_span = at_token.span.byte_span();
        let CssTokenKind::AtKeyword(name) = at_token.kind else {
            return;
        };
        let name = name.into_owned();

        let mut end = at_span.end;
        let mut atoms = Vec::new();
        let mut block = None;
        loop {
            match self.peek_class() {
                Peeked::Semicolon => {
                    if let Some(semicolon) = self.consume_token() {
                        end = semicolon.span.byte_span().end;
                    }
                    break;
                },
                Peeked::CurlyOpen => {
                    let contents = at_rule_block_contents(&name);
                    let (block_id, block_end) =
                        self.parse_block(contents, DelimiterContext::AtRuleBlock);
                    block = Some(block_id);
                    end = block_end;
                    break;
                },
                Peeked::Eof | Peeked::CurlyClose => break,
                _ => {
                    let atom = self.parse_component_value();
                    end = end.max(self.end_of(atom));
                    atoms.push(atom);
                },
            }
        }

        let at_rule = self.tree.alloc(NodeKind::AtRule { name: name.clone() }, None);
        let atoms = self.trim_whitespace(&atoms);
        if let Some(prelude_span) = self.cover(&atoms) {
            let prelude = self.tree.alloc(NodeKind::Prelude, Some(prelude_span));
            if name.eq_ignore_ascii_case("media") {
                self.build_media_query_list(prelude, &atoms);
            } else {
                for atom in atoms {
                    self.tree.push_parsed_child(prelude, atom);
                }
            }
            self.tree.push_parsed_child(at_rule, prelude);
        }
        if let Some(block) = block {
            self.tree.push_parsed_child(at_rule, block);
        }
        self.tree.set_span(at_rule, ByteSpan::new(at_span.start, end));
        self.tree.push_parsed_child(container, at_rule);
    }

    /// Splits an `@media` prelude into `MediaQuery` nodes at top-level
    /// commas.
    fn build_media_query_list(&mut self, prelude: NodeId, atoms: &[NodeId]) {
        for group in self.split_at_commas(atoms) {
            let Some(span) = self.cover(&group) else {
                continue;
            };
            let text = collapse_whitespace(self.slice(span));
            let query = self.tree.alloc(NodeKind::MediaQuery { text }, Some(span));
            for atom in group {
                self.tree.push_parsed_child(query, atom);
            }
            self.tree.push_parsed_child(prelude, query);
        }
    }

    /// Parses a qualified (style) rule: a selector list followed by a
    /// declaration block.
    fn parse_qualified_rule(&mut self, container: NodeId, context: RuleContext) {
        let start = self.peek_span().byte_span().start;
        let mut atoms = Vec::new();

        loop {
            match self.peek_class() {
                Peeked::CurlyOpen => break,
                Peeked::Eof => {
                    let mut error = CssParseError::new(
                        "Expected `{` after selector, found end of input",
                        self.eof_span(),
                        CssParseErrorKind::UnexpectedEof {
                            expected: vec!["{".to_string()],
                        },
                    );
                    error.add_note_with_span(
                        "The rule starts here",
                        self.span_for(ByteSpan::new(start, start)),
                    );
                    self.record_error(error);
                    let end = self.last_end_offset();
                    self.push_raw(container, start, end);
                    return;
                },
                Peeked::CurlyClose if context != RuleContext::TopLevel => {
                    self.record_unexpected_in_prelude("{");
                    let end = self.last_end_offset();
                    self.push_raw(container, start, end);
                    return;
                },
                Peeked::Semicolon if context == RuleContext::NestedInDeclarations => {
                    self.record_unexpected_in_prelude("{");
                    let end = self.last_end_offset();
                    self.push_raw(container, start, end);
                    return;
                },
                _ => atoms.push(self.parse_component_value()),
            }
        }

        let selector_list = self.build_selector_list(&atoms, start);
        let (block, end) = self.parse_block(BlockContents::Declarations, DelimiterContext::RuleBlock);

        let rule = self.tree.alloc(NodeKind::Rule, Some(ByteSpan::new(start, end)));
        self.tree.push_parsed_child(rule, selector_list);
        self.tree.push_parsed_child(rule, block);
        self.tree.push_parsed_child(container, rule);
    }

    fn record_unexpected_in_prelude(&mut self, expected: &str) {
        let span = self.peek_span();
        let found = self.peek_description();
        let mut error = CssParseError::new(
            format!("Expected `{expected}` after selector, found {found}"),
            span,
            CssParseErrorKind::UnexpectedToken {
                expected: vec![expected.to_string()],
                found,
            },
        );
        error.add_note("The rule is kept as unparsed text");
        self.record_error(error);
    }

    /// Splits the prelude of a qualified rule into `Selector` nodes at
    /// top-level commas.
    fn build_selector_list(&mut self, atoms: &[NodeId], rule_start: u32) -> NodeId {
        let trimmed = self.trim_whitespace(atoms);
        let list_span = self
            .cover(&trimmed)
            .unwrap_or_else(|| ByteSpan::new(rule_start, rule_start));
        let list = self.tree.alloc(NodeKind::SelectorList, Some(list_span));

        let mut group_start = rule_start;
        for group in self.split_at_commas(atoms) {
            let has_content = group
                .iter()
                .any(|id| !self.tree.kind(*id).is_comment());
            match self.cover(&group) {
                Some(span) if has_content => {
                    let text = normalize_selector(self.slice(span));
                    let selector = self.tree.alloc(NodeKind::Selector { text }, Some(span));
                    for atom in group {
                        self.tree.push_parsed_child(selector, atom);
                    }
                    self.tree.push_parsed_child(list, selector);
                    group_start = span.end;
                },
                _ => {
                    let mut error = CssParseError::new(
                        "Expected a selector",
                        self.span_for(ByteSpan::new(group_start, group_start)),
                        CssParseErrorKind::EmptySelector,
                    );
                    error.add_help("Remove the extra `,` or add a selector");
                    self.record_error(error);
                },
            }
        }

        list
    }

    // =========================================================================
    // Blocks and declarations
    // =========================================================================

    /// Parses a `{ ... }` block. Returns the block and its end offset.
    fn parse_block(&mut self, contents: BlockContents, context: DelimiterContext) -> (NodeId, u32) {
        let block = self.tree.alloc(NodeKind::Block { contents }, None);
        let Some(open) = self.consume_token() else {
            return (block, self.last_end_offset());
        };
        let open_span = open.span.byte_span();

        if self.enter_recursion(&open.span).is_err() {
            let (inner_end, end) = self.skip_nested_remainder();
            self.push_raw(block, open_span.end, inner_end);
            self.tree.set_span(block, ByteSpan::new(open_span.start, end));
            return (block, end);
        }

        self.push_delimiter(open.span, context);
        match contents {
            BlockContents::Rules => self.parse_rule_list(block, RuleContext::NestedInRules),
            BlockContents::Declarations => self.parse_declaration_list(block),
        }

        let delimiter = self.pop_delimiter();
        let end = if self.peek_class() == Peeked::CurlyClose {
            self.consume_token();
            self.last_end_offset()
        } else {
            self.record_unclosed(delimiter, '{', '}');
            self.last_end_offset()
        };
        self.exit_recursion();

        self.tree.set_span(block, ByteSpan::new(open_span.start, end));
        (block, end)
    }

    /// Parses declarations, nested at-rules and nested rules into `block`
    /// until a closing `}` or EOF.
    fn parse_declaration_list(&mut self, block: NodeId) {
        loop {
            match self.peek_class() {
                Peeked::Eof | Peeked::CurlyClose => break,
                Peeked::Whitespace | Peeked::Semicolon => {
                    self.consume_token();
                },
                Peeked::Comment => self.parse_comment(block),
                Peeked::AtKeyword => self.parse_at_rule(block),
                Peeked::Ident if self.starts_nested_rule() => {
                    self.parse_qualified_rule(block, RuleContext::NestedInDeclarations)
                },
                Peeked::Ident => self.parse_declaration(block),
                Peeked::Error => {
                    if let Some(token) = self.consume_token() {
                        self.handle_lexer_error(&token);
                        let span = token.span.byte_span();
                        self.recover_raw_declaration(block, span.start, span.end);
                    }
                },
                _ => self.parse_qualified_rule(block, RuleContext::NestedInDeclarations),
            }
        }
    }

    /// Returns `true` if the ident at the front of a declaration list
    /// opens a nested style rule (`b { ... }`, `li:hover { ... }`) rather
    /// than a declaration, i.e. a `{` comes before the next `;` or `}`.
    ///
    /// Custom properties are always declarations: their values may hold
    /// `{}` blocks.
    fn starts_nested_rule(&mut self) -> bool {
        if let Some(CssTokenKind::Ident(name)) = self.token_stream.peek().map(|t| &t.kind)
            && name.starts_with("--")
        {
            return false;
        }
        let mut n = 1;
        loop {
            match self.token_stream.peek_nth(n).map(|t| &t.kind) {
                Some(CssTokenKind::CurlyBraceOpen) => return true,
                None
                | Some(
                    CssTokenKind::Eof
                    | CssTokenKind::Semicolon
                    | CssTokenKind::CurlyBraceClose
                    | CssTokenKind::Error { .. },
                ) => return false,
                Some(_) => n += 1,
            }
        }
    }

    /// Parses `property: value [!important]`.
    fn parse_declaration(&mut self, block: NodeId) {
        let Some(name_token) = self.consume_token() else {
            return;
        };
        let name_span = name_token.span.byte_span();
        let CssTokenKind::Ident(property) = name_token.kind else {
            return;
        };
        let property = property.into_owned();

        self.skip_whitespace_and_comments();
        if self.peek_class() != Peeked::Colon {
            let span = self.peek_span();
            let found = self.peek_description();
            let mut error = CssParseError::new(
                format!("Expected `:` after property name `{property}`, found {found}"),
                span,
                CssParseErrorKind::UnexpectedToken {
                    expected: vec![":".to_string()],
                    found,
                },
            );
            error.add_help("Declarations are written as `property: value`");
            self.record_error(error);
            self.recover_raw_declaration(block, name_span.start, name_span.end);
            return;
        }
        let colon_end = self
            .consume_token()
            .map_or(name_span.end, |colon| colon.span.byte_span().end);

        let mut atoms = Vec::new();
        loop {
            match self.peek_class() {
                Peeked::Semicolon | Peeked::CurlyClose | Peeked::Eof => break,
                _ => atoms.push(self.parse_component_value()),
            }
        }

        let mut atoms = self.trim_whitespace(&atoms);
        let mut end = atoms.last().map_or(colon_end, |last| self.end_of(*last));
        let mut important = false;
        if let Some(bang_index) = self.important_suffix(&atoms) {
            important = true;
            atoms = self.trim_whitespace(&atoms[..bang_index]);
        }
        if !important {
            end = atoms.last().map_or(colon_end, |last| self.end_of(*last));
        }

        if atoms.is_empty() && !property.starts_with("--") {
            let mut error = CssParseError::new(
                format!("Expected a value for property `{property}`"),
                self.span_for(ByteSpan::new(name_span.start, end)),
                CssParseErrorKind::InvalidDeclaration,
            );
            error.add_note("The declaration is kept as unparsed text");
            self.record_error(error);
            self.push_raw(block, name_span.start, end);
            return;
        }

        let value_span = self
            .cover(&atoms)
            .unwrap_or_else(|| ByteSpan::new(colon_end, colon_end));
        let value = self.tree.alloc(NodeKind::Value, Some(value_span));
        for atom in atoms {
            self.tree.push_parsed_child(value, atom);
        }

        let declaration = self.tree.alloc(
            NodeKind::Declaration { property, important },
            Some(ByteSpan::new(name_span.start, end)),
        );
        self.tree.push_parsed_child(declaration, value);
        self.tree.push_parsed_child(block, declaration);
    }

    /// If `atoms` ends in `! important`, returns the index of the `!`.
    fn important_suffix(&self, atoms: &[NodeId]) -> Option<usize> {
        let last = atoms.last()?;
        let is_important = matches!(
            self.tree.kind(*last),
            NodeKind::Ident { name } if name.eq_ignore_ascii_case("important"),
        );
        if !is_important {
            return None;
        }
        let bang_index = atoms[..atoms.len() - 1].iter().rposition(|id| {
            !matches!(self.tree.kind(*id), NodeKind::Whitespace | NodeKind::Comment { .. })
        })?;
        match self.tree.kind(atoms[bang_index]) {
            NodeKind::Other { text } if text == "!" => Some(bang_index),
            _ => None,
        }
    }

    /// Skips to the end of a malformed declaration and keeps its text as a
    /// `Raw` node.
    fn recover_raw_declaration(&mut self, block: NodeId, start: u32, mut end: u32) {
        loop {
            match self.peek_class() {
                Peeked::Semicolon | Peeked::CurlyClose | Peeked::Eof => break,
                _ => end = self.skip_component_value(),
            }
        }
        self.push_raw(block, start, end);
    }

    // =========================================================================
    // Component values
    // =========================================================================

    /// Parses one component value: a token, a function, or a bracketed
    /// group.
    fn parse_component_value(&mut self) -> NodeId {
        let Some(CssToken { kind, span }) = self.consume_token() else {
            let end = self.last_end_offset();
            return self.tree.alloc(
                NodeKind::Other { text: String::new() },
                Some(ByteSpan::new(end, end)),
            );
        };
        let byte_span = span.byte_span();

        let node_kind = match kind {
            CssTokenKind::Whitespace => NodeKind::Whitespace,
            CssTokenKind::Comment(text) => NodeKind::Comment { text: text.into_owned() },
            CssTokenKind::Ident(name) => NodeKind::Ident { name: name.into_owned() },
            CssTokenKind::QuotedString(raw) => string_literal(&raw),
            CssTokenKind::Url(url) => NodeKind::Url {
                url: url.into_owned(),
                quote: None,
            },
            CssTokenKind::Comma => NodeKind::Comma,
            CssTokenKind::Function(name) => {
                return self.parse_function(name.into_owned(), span);
            },
            CssTokenKind::ParenOpen => {
                return self.parse_simple_block('(', span, DelimiterContext::ParenthesizedGroup);
            },
            CssTokenKind::SquareBracketOpen => {
                return self.parse_simple_block('[', span, DelimiterContext::SquareBracketGroup);
            },
            CssTokenKind::CurlyBraceOpen => {
                return self.parse_simple_block('{', span, DelimiterContext::CurlyBraceGroup);
            },
            CssTokenKind::ParenClose
            | CssTokenKind::SquareBracketClose
            | CssTokenKind::CurlyBraceClose => {
                let text = self.slice(byte_span);
                let mut error = CssParseError::new(
                    format!("Unexpected `{text}` with no matching opener"),
                    span,
                    CssParseErrorKind::UnexpectedToken {
                        expected: vec![],
                        found: text.to_string(),
                    },
                );
                error.add_help(format!("Remove the stray `{text}`"));
                self.record_error(error);
                NodeKind::Other { text: text.to_string() }
            },
            CssTokenKind::Error { message, error_notes } => {
                self.record_error(CssParseError::from_lexer_error(message, span, error_notes));
                NodeKind::Other {
                    text: self.slice(byte_span).to_string(),
                }
            },
            _ => NodeKind::Other {
                text: self.slice(byte_span).to_string(),
            },
        };

        self.tree.alloc(node_kind, Some(byte_span))
    }

    /// Parses the arguments of a function whose `name(` token was just
    /// consumed.
    ///
    /// `url("...")` with a single string argument becomes a `Url` node.
    fn parse_function(&mut self, name: String, open_span: CssSourceSpan) -> NodeId {
        let start = open_span.byte_span().start;

        if self.enter_recursion(&open_span).is_err() {
            let (_, end) = self.skip_nested_remainder();
            let span = ByteSpan::new(start, end);
            let text = self.slice(span).to_string();
            return self.tree.alloc(NodeKind::Other { text }, Some(span));
        }
        self.push_delimiter(open_span, DelimiterContext::FunctionArguments);

        let mut children = Vec::new();
        let end = loop {
            match self.peek_class() {
                Peeked::Eof => {
                    let delimiter = self.pop_delimiter();
                    self.record_unclosed(delimiter, '(', ')');
                    break self.last_end_offset();
                },
                Peeked::CurlyClose => {
                    self.record_mismatched_close(')');
                    self.pop_delimiter();
                    break self.last_end_offset();
                },
                _ if self.peek_is_close(')') => {
                    self.consume_token();
                    self.pop_delimiter();
                    break self.last_end_offset();
                },
                _ => children.push(self.parse_component_value()),
            }
        };
        self.exit_recursion();

        let span = ByteSpan::new(start, end);
        if name.eq_ignore_ascii_case("url") {
            let significant: Vec<NodeId> = children
                .iter()
                .copied()
                .filter(|id| {
                    !matches!(self.tree.kind(*id), NodeKind::Whitespace | NodeKind::Comment { .. })
                })
                .collect();
            if let [only] = significant[..]
                && let NodeKind::StringLit { value, quote } = self.tree.kind(only)
            {
                let kind = NodeKind::Url {
                    url: value.clone(),
                    quote: Some(*quote),
                };
                return self.tree.alloc(kind, Some(span));
            }
        }

        let function = self.tree.alloc(NodeKind::Function { name }, Some(span));
        for child in children {
            self.tree.push_parsed_child(function, child);
        }
        function
    }

    /// Parses a `(...)`, `[...]` or `{...}` group whose opener was just
    /// consumed.
    fn parse_simple_block(
        &mut self,
        open: char,
        open_span: CssSourceSpan,
        context: DelimiterContext,
    ) -> NodeId {
        let start = open_span.byte_span().start;
        let close = match open {
            '(' => ')',
            '[' => ']',
            _ => '}',
        };

        if self.enter_recursion(&open_span).is_err() {
            let (_, end) = self.skip_nested_remainder();
            let span = ByteSpan::new(start, end);
            let text = self.slice(span).to_string();
            return self.tree.alloc(NodeKind::Other { text }, Some(span));
        }
        self.push_delimiter(open_span, context);

        let mut children = Vec::new();
        let end = loop {
            match self.peek_class() {
                Peeked::Eof => {
                    let delimiter = self.pop_delimiter();
                    self.record_unclosed(delimiter, open, close);
                    break self.last_end_offset();
                },
                _ if self.peek_is_close(close) => {
                    self.consume_token();
                    self.pop_delimiter();
                    break self.last_end_offset();
                },
                Peeked::CurlyClose => {
                    self.record_mismatched_close(close);
                    self.pop_delimiter();
                    break self.last_end_offset();
                },
                _ => children.push(self.parse_component_value()),
            }
        };
        self.exit_recursion();

        let block = self.tree.alloc(
            NodeKind::SimpleBlock { open },
            Some(ByteSpan::new(start, end)),
        );
        for child in children {
            self.tree.push_parsed_child(block, child);
        }
        block
    }

    /// Returns `true` if the next token is the closing punctuator `close`.
    fn peek_is_close(&mut self, close: char) -> bool {
        self.token_stream
            .peek()
            .is_some_and(|t| t.kind.close_char() == Some(close))
    }
}

/// Returns how the block of an at-rule named `name` is parsed.
///
/// Descriptor at-rules hold declarations; everything else (including
/// unknown at-rules) holds rules.
fn at_rule_block_contents(name: &str) -> BlockContents {
    let lower = name.to_ascii_lowercase();
    let unprefixed = strip_vendor_prefix(&lower);
    match unprefixed {
        "font-face"
        | "page"
        | "property"
        | "counter-style"
        | "font-palette-values"
        | "font-feature-values"
        | "viewport"
        | "color-profile"
        | "position-try"
        | "view-transition"
        | "top-left"
        | "top-center"
        | "top-right"
        | "bottom-left"
        | "bottom-center"
        | "bottom-right" => BlockContents::Declarations,
        _ => BlockContents::Rules,
    }
}

/// Strips a `-webkit-`/`-moz-`/`-ms-`/`-o-` style prefix.
pub(crate) fn strip_vendor_prefix(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix('-')
        && let Some(dash) = rest.find('-')
    {
        return &rest[dash + 1..];
    }
    name
}

/// Builds a `StringLit` from a quoted string token's raw text.
fn string_literal(raw: &str) -> NodeKind {
    let mut chars = raw.chars();
    let quote = chars.next().unwrap_or('"');
    let inner = &raw[quote.len_utf8()..];
    let value = inner.strip_suffix(quote).unwrap_or(inner);
    NodeKind::StringLit {
        value: value.to_string(),
        quote,
    }
}
