//! Pruning passes over a [`StyleAst`](crate::StyleAst).
//!
//! Every pass is an inherent method on `StyleAst` that mutates it in
//! place, returns the number of things it removed or rewrote, and leaves
//! the tree free of dangling empty rules. The free functions exported
//! here are the predicates the passes are built on.

mod at_rules;
mod comments;
mod embeds;
mod filters;
mod fonts;
mod media_queries;
mod properties;
mod prune_options;
mod selectors;
mod urls;
mod variables;

pub use embeds::is_large_base64_embed;
pub use embeds::MAX_BASE64_LENGTH;
pub use filters::AtRuleDescriptor;
pub use filters::AtRuleFilter;
pub use filters::FilterSpec;
pub use filters::PropertyFilter;
pub use filters::PropertyPatternFilter;
pub use fonts::normalize_font_family;
pub use media_queries::is_useful_media_query_text;
pub use properties::is_excluded_property;
pub use prune_options::PruneOptions;
pub use selectors::is_excluded_selector;
