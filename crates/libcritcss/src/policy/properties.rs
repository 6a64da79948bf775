use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::StyleAst;
use crate::VisitAction;
use regex::RegexSet;
use regex::RegexSetBuilder;
use std::sync::LazyLock;

/// Properties that only matter once the user interacts with the page.
static EXCLUDED_PROPERTIES: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSetBuilder::new([
        r"^.*transition.*$",
        r"^cursor$",
        r"^pointer-events$",
        r"^(-webkit-)?tap-highlight-color$",
        r"^.*user-select$",
    ])
    .case_insensitive(true)
    .build()
    .expect("excluded property patterns are valid")
});

/// Returns `true` for properties removed by
/// [`StyleAst::prune_excluded_properties`].
///
/// ```
/// use libcritcss::policy::is_excluded_property;
///
/// assert!(is_excluded_property("transition-duration"));
/// assert!(is_excluded_property("-webkit-user-select"));
/// assert!(is_excluded_property("cursor"));
/// assert!(!is_excluded_property("cursor-color"));
/// assert!(!is_excluded_property("color"));
/// ```
pub fn is_excluded_property(property: &str) -> bool {
    EXCLUDED_PROPERTIES.is_match(property)
}

impl StyleAst {
    /// Removes declarations of interaction-only properties (transitions,
    /// cursors, pointer events, tap highlights, user selection). Returns
    /// the number of removed declarations.
    pub fn prune_excluded_properties(&mut self) -> usize {
        let root = self.tree.root();
        let stats = self.tree.walk(root, &mut |tree: &mut StyleTree, id: NodeId| {
            match tree.kind(id) {
                NodeKind::Declaration { property, .. } if is_excluded_property(property) => {
                    VisitAction::Remove
                },
                NodeKind::Declaration { .. } | NodeKind::Prelude | NodeKind::SelectorList => {
                    VisitAction::SkipChildren
                },
                _ => VisitAction::Continue,
            }
        });
        tracing::debug!(
            removed = stats.removed,
            cascaded = stats.cascaded,
            "pruned excluded properties",
        );
        stats.removed
    }
}
