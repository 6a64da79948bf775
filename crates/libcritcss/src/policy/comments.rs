use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::StyleAst;
use crate::VisitAction;

impl StyleAst {
    /// Removes every comment, including those inside selectors, media
    /// queries and values. Returns the number of removed comments.
    ///
    /// Selectors and media queries that contained a comment are rendered
    /// from their normalized text afterwards. A comment that was the only
    /// thing between two component values becomes a single space, so
    /// `margin: 1px/**/2px` keeps two lengths.
    ///
    /// ```
    /// use libcritcss::StyleAst;
    ///
    /// let mut ast = StyleAst::parse("a { margin: 1px/**/2px }").unwrap();
    /// assert_eq!(ast.prune_comments(), 1);
    /// assert_eq!(ast.to_css(), "a{margin:1px 2px}");
    /// ```
    pub fn prune_comments(&mut self) -> usize {
        let mut spaced = 0;
        let root = self.tree.root();
        let stats = self.tree.walk(root, &mut |tree: &mut StyleTree, id: NodeId| {
            if !tree.kind(id).is_comment() {
                return VisitAction::Continue;
            }
            if separates_component_values(tree, id) {
                let space = tree.create_node(NodeKind::Whitespace);
                tree.replace(id, space);
                spaced += 1;
                VisitAction::SkipChildren
            } else {
                VisitAction::Remove
            }
        });
        let removed = stats.removed + spaced;
        tracing::debug!(removed, spaced, "pruned comments");
        removed
    }
}

/// Returns `true` if dropping the comment `id` would join the component
/// values on either side of it into one token.
fn separates_component_values(tree: &StyleTree, id: NodeId) -> bool {
    let Some(parent) = tree.parent(id) else {
        return false;
    };
    if !matches!(
        tree.kind(parent),
        NodeKind::Value
            | NodeKind::Prelude
            | NodeKind::MediaQuery { .. }
            | NodeKind::Function { .. }
            | NodeKind::SimpleBlock { .. },
    ) {
        return false;
    }

    let siblings = tree.children(parent);
    let Some(index) = siblings.iter().position(|child| *child == id) else {
        return false;
    };
    let is_token = |sibling: Option<&NodeId>| {
        sibling.is_some_and(|sibling| {
            !matches!(
                tree.kind(*sibling),
                NodeKind::Whitespace | NodeKind::Comment { .. } | NodeKind::Comma,
            )
        })
    };
    index > 0 && is_token(siblings.get(index - 1)) && is_token(siblings.get(index + 1))
}
