use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::ast::normalize_selector;
use crate::StyleAst;
use crate::VisitAction;
use indexmap::IndexSet;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Selectors that only style the user's text selection. They can never
/// match during a critical-path render, so they are not reported.
static EXCLUDED_SELECTORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"::?(-moz-)?selection").expect("excluded selector pattern is valid")
});

/// Returns `true` for selectors [`StyleAst::for_each_selector`] skips.
///
/// ```
/// use libcritcss::policy::is_excluded_selector;
///
/// assert!(is_excluded_selector("p::selection"));
/// assert!(is_excluded_selector("::-moz-selection"));
/// assert!(!is_excluded_selector("p::before"));
/// ```
pub fn is_excluded_selector(selector: &str) -> bool {
    EXCLUDED_SELECTORS.is_match(selector)
}

impl StyleAst {
    /// Removes every selector whose normalized text is not in
    /// `critical_selectors`, then every rule left without selectors.
    ///
    /// Critical selectors are normalized before comparison. Keyframe stops
    /// are never removed. Returns the number of removed selectors.
    pub fn prune_non_critical_selectors(&mut self, critical_selectors: &IndexSet<String>) -> usize {
        let critical: HashSet<String> = critical_selectors
            .iter()
            .map(|selector| normalize_selector(selector))
            .collect();

        let root = self.tree.root();
        let stats = self.tree.walk(root, &mut |tree: &mut StyleTree, id: NodeId| {
            match tree.kind(id) {
                NodeKind::Rule if tree.is_keyframe_rule(id) => VisitAction::SkipChildren,
                NodeKind::Selector { text } if critical.contains(text) => {
                    VisitAction::SkipChildren
                },
                NodeKind::Selector { .. } => VisitAction::Remove,
                NodeKind::Prelude | NodeKind::Declaration { .. } => VisitAction::SkipChildren,
                _ => VisitAction::Continue,
            }
        });

        tracing::debug!(
            removed = stats.removed,
            rules_removed = stats.cascaded,
            critical = critical.len(),
            "pruned non-critical selectors",
        );
        stats.removed
    }
}
