//! A lossless CSS parser and pruning engine for extracting critical
//! (above-the-fold) stylesheets.
//!
//! Stylesheets are parsed into a span-preserving tree ([`ast::StyleTree`])
//! wrapped by [`StyleAst`]. Pruning passes remove what a page does not
//! need to render its first viewport, and serialization copies every
//! untouched subtree byte-for-byte from the original source.
//!
//! ```
//! use indexmap::IndexSet;
//! use libcritcss::StyleAst;
//!
//! let ast = StyleAst::parse("a { color: red }\n.b { color: blue }").unwrap();
//! let critical: IndexSet<String> = [".b".to_string()].into_iter().collect();
//! assert_eq!(ast.pruned(&critical).to_css(), ".b { color: blue }");
//! ```

pub mod ast;
mod byte_span;
mod critical_selector_source;
mod css_error_note;
mod css_parse_error;
mod css_parse_error_kind;
mod css_parser;
mod css_source_span;
mod css_token_stream;
mod parse_result;
pub mod policy;
mod query;
mod source_position;
mod style_ast;
mod style_ast_error;
pub mod token;
pub mod token_source;
mod walker;

pub use byte_span::ByteSpan;
pub use critical_selector_source::CriticalSelectorSource;
pub use critical_selector_source::StaticSelectorSource;
pub use critical_selector_source::UpstreamFailure;
pub use critical_selector_source::Viewport;
pub use css_error_note::CssErrorNote;
pub use css_error_note::CssErrorNoteKind;
pub use css_error_note::CssErrorNotes;
pub use css_parse_error::CssParseError;
pub use css_parse_error_kind::CssParseErrorKind;
pub use css_parser::CssParser;
pub use css_source_span::CssSourceSpan;
pub use css_token_stream::CssTokenStream;
pub use parse_result::ParseResult;
pub use policy::FilterSpec;
pub use policy::PruneOptions;
pub use smallvec::smallvec;
pub use smallvec::SmallVec;
pub use source_position::SourcePosition;
pub use style_ast::StyleAst;
pub use style_ast_error::StyleAstError;
pub use walker::NodeVisitor;
pub use walker::VisitAction;
pub use walker::WalkStats;

#[cfg(test)]
mod tests;
