//! Generic pre-order traversal with in-place removal.
//!
//! A [`NodeVisitor`] is called for every node reachable from a starting
//! node and decides, per node, whether to descend, skip the subtree, or
//! remove the node. Removals cascade upward: a rule left without
//! selectors or declarations is removed too, and so is a grouping
//! at-rule whose block became empty, all the way up to (but never
//! including) the stylesheet root.
//!
//! ```
//! use libcritcss::ast::NodeId;
//! use libcritcss::ast::NodeKind;
//! use libcritcss::ast::StyleTree;
//! use libcritcss::CssParser;
//! use libcritcss::VisitAction;
//!
//! let source = "a { color: red } @media print { b { color: blue } }";
//! let mut tree = CssParser::new(source).parse_stylesheet().into_ast().unwrap();
//! let root = tree.root();
//! let stats = tree.walk(root, &mut |tree: &mut StyleTree, id: NodeId| {
//!     match tree.kind(id) {
//!         NodeKind::Declaration { property, .. } if property == "color" => VisitAction::Remove,
//!         _ => VisitAction::Continue,
//!     }
//! });
//! assert_eq!(stats.removed, 2);
//! assert_eq!(tree.to_css(root, Some(source)), "");
//! ```

use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;

/// What the walker should do after visiting a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VisitAction {
    /// Visit the node's children.
    Continue,
    /// Keep the node but don't visit its children.
    SkipChildren,
    /// Detach the node (and its subtree) from the tree.
    Remove,
}

/// Callback invoked by [`StyleTree::walk`] for every visited node.
///
/// Implemented for any `FnMut(&mut StyleTree, NodeId) -> VisitAction`.
/// Visitors may freely mutate the node they are given (for example
/// rewriting a url) as long as they report changes through the tree's
/// mutation methods so that modification tracking stays accurate.
pub trait NodeVisitor {
    fn visit(&mut self, tree: &mut StyleTree, id: NodeId) -> VisitAction;
}

impl<F> NodeVisitor for F
where
    F: FnMut(&mut StyleTree, NodeId) -> VisitAction,
{
    fn visit(&mut self, tree: &mut StyleTree, id: NodeId) -> VisitAction {
        self(tree, id)
    }
}

/// Counters reported by [`StyleTree::walk`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WalkStats {
    /// Number of nodes passed to the visitor.
    pub visited: usize,
    /// Number of nodes the visitor asked to remove.
    pub removed: usize,
    /// Number of rules and at-rules removed because they became empty.
    pub cascaded: usize,
}

impl StyleTree {
    /// Visits `from` and its descendants in pre-order, applying the
    /// visitor's decisions.
    ///
    /// Removal cascades are resolved once the traversal is complete, so a
    /// visitor never observes a half-removed rule. Asking to remove the
    /// root is ignored.
    pub fn walk<V: NodeVisitor + ?Sized>(&mut self, from: NodeId, visitor: &mut V) -> WalkStats {
        let mut stats = WalkStats::default();
        let mut former_parents = Vec::new();
        let mut stack = vec![from];

        while let Some(id) = stack.pop() {
            stats.visited += 1;
            match visitor.visit(self, id) {
                VisitAction::Continue => {
                    stack.extend(self.children(id).iter().rev().copied());
                },
                VisitAction::SkipChildren => {},
                VisitAction::Remove => {
                    if let Some(parent) = self.parent(id)
                        && self.detach(id)
                    {
                        stats.removed += 1;
                        former_parents.push(parent);
                    }
                },
            }
        }

        for parent in former_parents {
            stats.cascaded += self.cascade_empty(parent);
        }
        stats
    }

    /// Detaches `id` and removes any ancestors left empty by its removal.
    ///
    /// Returns the number of nodes removed (including `id`), or 0 if `id`
    /// was already detached.
    pub fn remove(&mut self, id: NodeId) -> usize {
        let Some(parent) = self.parent(id) else {
            return 0;
        };
        if !self.detach(id) {
            return 0;
        }
        1 + self.cascade_empty(parent)
    }

    /// Removes every rule without selectors or declarations and every
    /// at-rule whose block is empty, innermost first.
    ///
    /// Returns the number of nodes removed.
    pub fn remove_empty_rules(&mut self) -> usize {
        let candidates: Vec<NodeId> = self
            .descendants(self.root())
            .filter(|id| matches!(self.kind(*id), NodeKind::Rule | NodeKind::AtRule { .. }))
            .collect();

        let mut removed = 0;
        for id in candidates.into_iter().rev() {
            if self.is_structurally_empty(id) && self.detach(id) {
                removed += 1;
            }
        }
        removed
    }

    fn is_structurally_empty(&self, id: NodeId) -> bool {
        match self.kind(id) {
            NodeKind::Rule => self.rule_is_empty(id),
            NodeKind::AtRule { .. } => self.at_rule_is_empty(id),
            _ => false,
        }
    }

    /// Walks up from `start`, removing rules and at-rules that are now
    /// empty. Selector lists and blocks defer to their owning rule.
    fn cascade_empty(&mut self, start: NodeId) -> usize {
        let mut removed = 0;
        let mut current = Some(start);
        while let Some(id) = current {
            if id == self.root() {
                break;
            }
            let parent = self.parent(id);
            match self.kind(id) {
                NodeKind::SelectorList | NodeKind::Block { .. } | NodeKind::Prelude => {
                    current = parent;
                    continue;
                },
                NodeKind::Rule | NodeKind::AtRule { .. } if self.is_structurally_empty(id) => {},
                _ => break,
            }
            if !self.detach(id) {
                break;
            }
            removed += 1;
            current = parent;
        }
        removed
    }
}
