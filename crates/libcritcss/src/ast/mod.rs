//! The span-preserving stylesheet tree.
//!
//! A parsed stylesheet is stored as an arena ([`StyleTree`]) of [`Node`]s
//! addressed by [`NodeId`]. Every node produced by the parser records the
//! [`ByteSpan`](crate::ByteSpan) of source text it was parsed from and
//! starts out *pristine*.
//!
//! Serialization has two modes per node:
//!
//! - **Source-slice mode (lossless):** a pristine node with a span is
//!   emitted as the exact bytes of its span.
//! - **Structural mode (compact):** a node that was modified (or has no
//!   span because it was synthesized) is rebuilt from its semantic data
//!   and its children, each of which again picks its own mode.
//!
//! Any mutation marks the node and all of its ancestors as modified, so an
//! untouched tree serializes to exactly its input and a pruned tree keeps
//! the original formatting of every subtree that survived unchanged.
//!
//! # Example
//!
//! ```rust
//! use libcritcss::CssParser;
//!
//! let source = "a { color: red }\nb { color: blue }";
//! let tree = CssParser::new(source).parse_stylesheet().into_ast().unwrap();
//! assert_eq!(tree.to_css(tree.root(), Some(source)), source);
//! ```

mod ast_node;
mod component_text;
mod node;
mod node_id;
mod node_kind;
mod serialize;
mod style_tree;

pub use ast_node::AstNode;
pub use ast_node::NodeRef;
pub use component_text::collapse_whitespace;
pub use component_text::normalize_selector;
pub use node::Node;
pub use node_id::NodeId;
pub use node_kind::BlockContents;
pub use node_kind::NodeKind;
pub use style_tree::Ancestors;
pub use style_tree::Descendants;
pub use style_tree::StyleTree;

#[cfg(test)]
mod tests;
