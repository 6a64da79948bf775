use crate::ast::NodeId;
use crate::ast::StyleTree;
use crate::CssParseError;
use crate::CssParser;
use crate::NodeVisitor;
use crate::PruneOptions;
use crate::StyleAstError;
use crate::WalkStats;
use indexmap::IndexSet;
use std::path::Path;
use std::sync::Arc;

/// A parsed stylesheet: its source text, its tree and the diagnostics
/// collected while parsing.
///
/// In-place passes (`prune_*`, `apply_*`, [`absolutify_urls`]) take
/// `&mut self`. [`pruned`] and [`pruned_with`] leave `self` untouched and
/// return a pruned copy.
///
/// The source text is shared between copies, so cloning costs one tree
/// copy. Independent instances can be pruned on different threads.
///
/// [`absolutify_urls`]: Self::absolutify_urls
/// [`pruned`]: Self::pruned
/// [`pruned_with`]: Self::pruned_with
#[derive(Clone, Debug)]
pub struct StyleAst {
    pub(crate) css: Arc<str>,
    pub(crate) tree: StyleTree,
    pub(crate) errors: Vec<CssParseError>,
}

impl StyleAst {
    /// Parses `css` into a new `StyleAst`.
    ///
    /// Malformed CSS is not an error: it is recorded in
    /// [`errors()`](Self::errors) and kept in the tree as opaque text.
    pub fn parse(css: &str) -> Result<Self, StyleAstError> {
        Self::build(Arc::from(css), None)
    }

    /// Parses raw bytes, which must be UTF-8.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, StyleAstError> {
        let css = std::str::from_utf8(bytes)?;
        Self::parse(css)
    }

    /// Parses `css`, attaching `path` to the spans of every diagnostic.
    pub fn parse_with_file_path(css: &str, path: &Path) -> Result<Self, StyleAstError> {
        Self::build(Arc::from(css), Some(path))
    }

    fn build(css: Arc<str>, path: Option<&Path>) -> Result<Self, StyleAstError> {
        if u32::try_from(css.len()).is_err() {
            return Err(StyleAstError::SourceTooLarge { len: css.len() });
        }

        let result = match path {
            Some(path) => CssParser::with_file_path(&*css, path).parse_stylesheet(),
            None => CssParser::new(&*css).parse_stylesheet(),
        };
        let (tree, errors) = result.into_parts();
        let tree = match tree {
            Some(tree) => tree,
            None => StyleTree::new(css.len() as u32),
        };

        tracing::debug!(
            bytes = css.len(),
            nodes = tree.arena_len(),
            errors = errors.len(),
            "parsed stylesheet",
        );
        Ok(Self { css, tree, errors })
    }

    /// The source text this stylesheet was parsed from.
    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn tree(&self) -> &StyleTree {
        &self.tree
    }

    /// Non-fatal diagnostics recorded while parsing.
    pub fn errors(&self) -> &[CssParseError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the exact source text `id` was parsed from, or `None` for
    /// synthesized nodes.
    ///
    /// The text is returned even if the node was modified since: it is
    /// what the author wrote, not what [`to_css`](Self::to_css) will emit.
    pub fn original_text(&self, id: NodeId) -> Option<&str> {
        self.tree.span(id)?.slice(&self.css)
    }

    /// Renders the current tree to CSS.
    ///
    /// An unmodified stylesheet renders to exactly its source text.
    pub fn to_css(&self) -> String {
        self.tree.to_css(self.tree.root(), Some(&self.css))
    }

    /// Walks the whole tree with `visitor`. See [`StyleTree::walk`].
    pub fn walk<V: NodeVisitor + ?Sized>(&mut self, visitor: &mut V) -> WalkStats {
        let root = self.tree.root();
        self.tree.walk(root, visitor)
    }

    /// Removes rules left without selectors or declarations and at-rules
    /// left with an empty block.
    pub fn remove_empty_rules(&mut self) -> usize {
        let removed = self.tree.remove_empty_rules();
        tracing::debug!(removed, "removed empty rules");
        removed
    }

    /// Returns a copy of this stylesheet pruned down to
    /// `critical_selectors`, using [`PruneOptions::default()`].
    pub fn pruned(&self, critical_selectors: &IndexSet<String>) -> StyleAst {
        self.pruned_with(critical_selectors, &PruneOptions::default())
    }

    /// Returns a copy of this stylesheet pruned down to
    /// `critical_selectors`.
    ///
    /// Passes run in this order: media queries, selectors, caller
    /// filters, excluded at-rules, excluded properties, large embeds,
    /// fonts (only when a whitelist is given), comments, and finally
    /// empty-rule cleanup.
    pub fn pruned_with(
        &self,
        critical_selectors: &IndexSet<String>,
        options: &PruneOptions,
    ) -> StyleAst {
        let mut pruned = self.clone();
        let rules_before = pruned.rule_count();

        pruned.prune_media_queries();
        pruned.prune_non_critical_selectors(critical_selectors);
        pruned.apply_filters(&options.filters);
        if !options.excluded_at_rules.is_empty() {
            pruned.prune_at_rules(&options.excluded_at_rules);
        }
        pruned.prune_excluded_properties();
        pruned.prune_large_base64_embeds_over(options.max_base64_length);
        if let Some(whitelist) = &options.font_whitelist {
            pruned.prune_non_critical_fonts(whitelist);
        }
        pruned.prune_comments();
        pruned.remove_empty_rules();

        tracing::debug!(
            rules_before,
            rules_after = pruned.rule_count(),
            critical = critical_selectors.len(),
            "pruned stylesheet",
        );
        pruned
    }
}

impl std::fmt::Display for StyleAst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_css())
    }
}
