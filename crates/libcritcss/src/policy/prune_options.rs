use crate::policy::FilterSpec;
use crate::policy::MAX_BASE64_LENGTH;
use indexmap::IndexSet;

/// Configuration for [`StyleAst::pruned_with`](crate::StyleAst::pruned_with).
#[derive(Debug)]
pub struct PruneOptions {
    /// Caller-supplied property and at-rule predicates.
    pub filters: FilterSpec,

    /// At-rule names (without `@`) removed wherever they appear.
    pub excluded_at_rules: Vec<String>,

    /// When set, `@font-face` rules for families outside the whitelist
    /// are removed.
    pub font_whitelist: Option<IndexSet<String>>,

    /// Longest base64 `data:` url (in encoded bytes) kept inline.
    pub max_base64_length: usize,
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            filters: FilterSpec::default(),
            excluded_at_rules: Vec::new(),
            font_whitelist: None,
            max_base64_length: MAX_BASE64_LENGTH,
        }
    }
}
