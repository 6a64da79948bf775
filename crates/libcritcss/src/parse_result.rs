//! Result type for parsing operations that may produce partial results.

use crate::CssParseError;

/// The result of a parsing operation.
///
/// Unlike `Result<T, E>`, `ParseResult` can contain both a tree and
/// errors. CSS is designed to be parsed forgivingly: a browser drops a
/// malformed declaration and keeps going, and so does this parser. The
/// recovered tree is always usable; the errors explain what was skipped
/// or kept as opaque text.
///
/// # Accessing the AST
///
/// - [`valid_ast()`](Self::valid_ast) returns the tree only if parsing was
///   completely clean.
/// - [`ast()`](Self::ast) returns the tree regardless of errors.
///
/// # Example
///
/// ```
/// use libcritcss::CssParser;
///
/// let source = "a { color: red } b { color }";
/// let result = CssParser::new(source).parse_stylesheet();
///
/// // `color` has no value: the declaration is kept as opaque text and
/// // both rules survive.
/// assert!(result.has_errors());
/// let tree = result.ast().unwrap();
/// assert_eq!(tree.rule_ids().count(), 2);
/// ```
#[derive(Debug)]
pub struct ParseResult<TAst> {
    /// The parsed AST, if parsing produced any result.
    ast: Option<TAst>,

    /// Errors encountered during parsing. Empty if parsing was completely
    /// successful.
    pub errors: Vec<CssParseError>,
}

impl<TAst> ParseResult<TAst> {
    /// Creates a successful parse result with no errors.
    pub(crate) fn ok(ast: TAst) -> Self {
        Self {
            ast: Some(ast),
            errors: Vec::new(),
        }
    }

    /// Creates a failed parse result with errors but no AST.
    #[cfg(test)]
    pub(crate) fn err(errors: Vec<CssParseError>) -> Self {
        Self { ast: None, errors }
    }

    /// Creates a recovered parse result with both AST and errors.
    pub(crate) fn recovered(ast: TAst, errors: Vec<CssParseError>) -> Self {
        Self {
            ast: Some(ast),
            errors,
        }
    }

    /// Returns the AST only if parsing was completely successful (no errors).
    pub fn valid_ast(&self) -> Option<&TAst> {
        if self.errors.is_empty() {
            self.ast.as_ref()
        } else {
            None
        }
    }

    /// Returns the AST if present, regardless of whether errors occurred.
    pub fn ast(&self) -> Option<&TAst> {
        self.ast.as_ref()
    }

    /// Takes ownership of the AST only if parsing was completely successful.
    pub fn into_valid_ast(self) -> Option<TAst> {
        if self.errors.is_empty() {
            self.ast
        } else {
            None
        }
    }

    /// Takes ownership of the AST regardless of errors.
    pub fn into_ast(self) -> Option<TAst> {
        self.ast
    }

    /// Splits this result into its AST and its errors.
    pub fn into_parts(self) -> (Option<TAst>, Vec<CssParseError>) {
        (self.ast, self.errors)
    }

    /// Returns `true` if parsing was completely successful (has AST, no
    /// errors).
    pub fn is_ok(&self) -> bool {
        self.ast.is_some() && self.errors.is_empty()
    }

    /// Returns `true` if any errors were encountered during parsing.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Formats all errors as a single string for display.
    pub fn format_errors(&self, source: Option<&str>) -> String {
        self.errors
            .iter()
            .map(|e| e.format_detailed(source))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<TAst> From<ParseResult<TAst>> for Result<TAst, Vec<CssParseError>> {
    /// Converts to a standard `Result`, treating recovered ASTs as errors.
    fn from(result: ParseResult<TAst>) -> Self {
        if result.errors.is_empty() {
            match result.ast {
                Some(ast) => Ok(ast),
                None => Err(Vec::new()),
            }
        } else {
            Err(result.errors)
        }
    }
}
