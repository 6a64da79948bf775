use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::StyleAst;
use crate::VisitAction;

/// Default length (in encoded bytes) above which a base64 `data:` url is
/// considered too large to inline in critical CSS.
pub const MAX_BASE64_LENGTH: usize = 1000;

/// Returns `true` if `url` is a base64 `data:` url longer than
/// `max_length` bytes.
///
/// ```
/// use libcritcss::policy::is_large_base64_embed;
///
/// assert!(is_large_base64_embed("data:image/png;base64,iVBORw0KGgo=", 10));
/// assert!(!is_large_base64_embed("data:image/png;base64,iVBORw0KGgo=", 1000));
/// assert!(!is_large_base64_embed("data:image/svg+xml,<svg></svg>", 10));
/// assert!(!is_large_base64_embed("https://example.com/base64.png", 10));
/// ```
pub fn is_large_base64_embed(url: &str, max_length: usize) -> bool {
    let url = url.trim();
    if url.len() <= max_length {
        return false;
    }
    let is_data = url
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"));
    if !is_data {
        return false;
    }
    let header = url.split_once(',').map_or(url, |(header, _)| header);
    header.to_ascii_lowercase().contains(";base64")
}

impl StyleAst {
    /// Removes declarations embedding a base64 `data:` url longer than
    /// [`MAX_BASE64_LENGTH`].
    pub fn prune_large_base64_embeds(&mut self) -> usize {
        self.prune_large_base64_embeds_over(MAX_BASE64_LENGTH)
    }

    /// Removes declarations embedding a base64 `data:` url longer than
    /// `max_length` bytes. The whole declaration goes, not just the url.
    /// Urls in at-rule preludes are left alone.
    ///
    /// Returns the number of removed declarations.
    pub fn prune_large_base64_embeds_over(&mut self, max_length: usize) -> usize {
        let root = self.tree.root();
        let stats = self.tree.walk(root, &mut |tree: &mut StyleTree, id: NodeId| {
            match tree.kind(id) {
                NodeKind::Declaration { .. } if has_large_embed(tree, id, max_length) => {
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
            max_length,
            "pruned large base64 embeds",
        );
        stats.removed
    }
}

fn has_large_embed(tree: &StyleTree, declaration: NodeId, max_length: usize) -> bool {
    tree.descendants(declaration).any(|id| match tree.kind(id) {
        NodeKind::Url { url, .. } => is_large_base64_embed(url, max_length),
        _ => false,
    })
}
