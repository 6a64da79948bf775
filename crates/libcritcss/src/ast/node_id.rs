/// Index of a [`Node`](crate::ast::Node) in its
/// [`StyleTree`](crate::ast::StyleTree) arena.
///
/// Ids are only meaningful for the tree that allocated them. They stay
/// valid after a node is detached: detached nodes remain in the arena, they
/// are simply no longer reachable from the root.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the arena index of this id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
