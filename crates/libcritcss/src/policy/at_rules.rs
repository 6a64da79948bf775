use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::StyleAst;
use crate::VisitAction;

impl StyleAst {
    /// Removes every at-rule named in `names` (without the `@`), at any
    /// depth.
    ///
    /// Names match exactly, ignoring ASCII case: `keyframes` does not
    /// remove `@-webkit-keyframes`. Returns the number of removed
    /// at-rules.
    ///
    /// ```
    /// use libcritcss::StyleAst;
    ///
    /// let mut ast = StyleAst::parse(
    ///     "@charset \"utf-8\"; @media screen { @PAGE { margin: 0 } a { b: c } }",
    /// ).unwrap();
    /// assert_eq!(ast.prune_at_rules(&["page", "charset"]), 2);
    /// assert_eq!(ast.to_css(), "@media screen{a { b: c }}");
    /// ```
    pub fn prune_at_rules<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        if names.is_empty() {
            return 0;
        }
        let root = self.tree.root();
        let stats = self.tree.walk(root, &mut |tree: &mut StyleTree, id: NodeId| {
            match tree.kind(id) {
                NodeKind::AtRule { name }
                    if names
                        .iter()
                        .any(|excluded| excluded.as_ref().eq_ignore_ascii_case(name)) =>
                {
                    VisitAction::Remove
                },
                NodeKind::StyleSheet
                | NodeKind::Rule
                | NodeKind::AtRule { .. }
                | NodeKind::Block { .. } => VisitAction::Continue,
                _ => VisitAction::SkipChildren,
            }
        });
        tracing::debug!(
            removed = stats.removed,
            cascaded = stats.cascaded,
            "pruned at-rules",
        );
        stats.removed
    }
}
