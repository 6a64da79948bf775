use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::StyleAst;
use crate::VisitAction;
use indexmap::IndexSet;

const CUSTOM_PROPERTY_PREFIX: &str = "--";

impl StyleAst {
    /// Returns the names of all custom properties read through `var()`,
    /// in order of first use.
    ///
    /// Fallbacks are scanned too, so `var(--a, var(--b))` uses both. So
    /// are the values of custom properties themselves.
    ///
    /// ```
    /// use libcritcss::StyleAst;
    ///
    /// let ast = StyleAst::parse(
    ///     ":root { --x: 1px; --y: var(--z) } a { margin: var(--x, var(--w)) }",
    /// ).unwrap();
    /// let used: Vec<_> = ast.get_used_variables().into_iter().collect();
    /// assert_eq!(used, ["--z", "--x", "--w"]);
    /// ```
    pub fn get_used_variables(&self) -> IndexSet<String> {
        let mut used = IndexSet::new();
        for id in self.tree.descendants(self.tree.root()) {
            if let Some(name) = var_reference(&self.tree, id) {
                used.insert(name.to_string());
            }
        }
        used
    }

    /// Removes custom property definitions whose name is not in
    /// `used_variables`. References are left alone even when their
    /// definition goes. Returns the number of removed definitions.
    pub fn prune_unused_variables(&mut self, used_variables: &IndexSet<String>) -> usize {
        let root = self.tree.root();
        let stats = self.tree.walk(root, &mut |tree: &mut StyleTree, id: NodeId| {
            match tree.kind(id) {
                NodeKind::Declaration { property, .. }
                    if property.starts_with(CUSTOM_PROPERTY_PREFIX)
                        && !used_variables.contains(property) =>
                {
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
            used = used_variables.len(),
            "pruned unused variables",
        );
        stats.removed
    }

    /// Repeats [`get_used_variables`](Self::get_used_variables) and
    /// [`prune_unused_variables`](Self::prune_unused_variables) until
    /// nothing changes, so variables only read by other unused variables
    /// go too. Returns the total number of removed definitions.
    pub fn prune_unused_variables_fully(&mut self) -> usize {
        let mut total = 0;
        loop {
            let used = self.get_used_variables();
            let removed = self.prune_unused_variables(&used);
            if removed == 0 {
                break;
            }
            total += removed;
        }
        total
    }
}

/// If `id` is a `var()` call, returns the custom property it reads.
fn var_reference(tree: &StyleTree, id: NodeId) -> Option<&str> {
    match tree.kind(id) {
        NodeKind::Function { name } if name.eq_ignore_ascii_case("var") => {},
        _ => return None,
    }
    let first = tree
        .children(id)
        .iter()
        .find(|child| {
            !matches!(
                tree.kind(**child),
                NodeKind::Whitespace | NodeKind::Comment { .. },
            )
        })?;
    match tree.kind(*first) {
        NodeKind::Ident { name } if name.starts_with(CUSTOM_PROPERTY_PREFIX) => Some(name),
        _ => None,
    }
}
