use crate::ast::BlockContents;
use crate::ast::Node;
use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ByteSpan;

/// Arena of [`Node`]s forming a stylesheet tree.
///
/// Nodes refer to each other by [`NodeId`]. Detaching a node never frees
/// it: it stays in the arena (so ids held by callers remain valid) but is
/// no longer reachable from [`root()`](Self::root) and is skipped by
/// serialization and traversal.
///
/// Cloning a tree is a deep copy; the clone and the original can be pruned
/// independently.
#[derive(Clone, Debug)]
pub struct StyleTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl StyleTree {
    /// Creates a tree containing only a `StyleSheet` root spanning
    /// `source_len` bytes.
    pub(crate) fn new(source_len: u32) -> Self {
        let root = Node::new(NodeKind::StyleSheet, Some(ByteSpan::new(0, source_len)));
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// Returns the id of the `StyleSheet` root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this tree (or a tree it was
    /// cloned from).
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> Option<ByteSpan> {
        self.node(id).span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn is_modified(&self, id: NodeId) -> bool {
        self.node(id).modified
    }

    /// Returns the number of nodes in the arena, including detached ones.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    // =========================================================================
    // Construction (parser)
    // =========================================================================

    /// Allocates a detached node.
    pub(crate) fn alloc(&mut self, kind: NodeKind, span: Option<ByteSpan>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, span));
        id
    }

    pub(crate) fn set_span(&mut self, id: NodeId, span: ByteSpan) {
        self.node_mut(id).span = Some(span);
    }

    /// Appends `child` to `parent` without marking anything modified.
    pub(crate) fn push_parsed_child(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Allocates a new, detached node with no source span.
    ///
    /// Synthesized nodes always serialize structurally.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.alloc(kind, None);
        self.node_mut(id).modified = true;
        id
    }

    /// Marks `id` and all of its ancestors as modified.
    pub fn mark_modified(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node_mut(node_id);
            node.modified = true;
            current = node.parent;
        }
    }

    /// Replaces the semantic data of `id` and marks it modified.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.node_mut(id).kind = kind;
        self.mark_modified(id);
    }

    /// Removes `id` from its parent's children.
    ///
    /// Returns `false` (and does nothing) if `id` is the root or already
    /// detached. The former parent is marked modified.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        self.node_mut(parent).children.retain(|child| *child != id);
        self.node_mut(id).parent = None;
        self.mark_modified(parent);
        true
    }

    /// Appends `child` as the last child of `parent`, detaching it from
    /// its previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let position = self.children(parent).len();
        self.insert_child(parent, position, child);
    }

    /// Inserts `child` into `parent`'s children at `index` (clamped to the
    /// number of children), detaching it from its previous parent first.
    ///
    /// Does nothing if the insertion would create a cycle or move the root.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if child == self.root
            || child == parent
            || self.ancestors(parent).any(|ancestor| ancestor == child)
        {
            return;
        }
        self.detach(child);
        let children = &mut self.node_mut(parent).children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
        self.mark_modified(parent);
    }

    /// Puts `replacement` at `old`'s position in its parent and detaches
    /// `old`.
    ///
    /// Returns `false` if `old` is detached (or the root).
    pub fn replace(&mut self, old: NodeId, replacement: NodeId) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        let Some(index) = self.children(parent).iter().position(|c| *c == old) else {
            return false;
        };
        self.detach(old);
        self.insert_child(parent, index, replacement);
        true
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Pre-order iterator over `id` and all of its descendants.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Iterator over the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Iterator over every attached `Rule` node, in document order.
    pub fn rule_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root)
            .filter(|id| self.kind(*id).is_rule())
    }

    /// Returns the first child of `id` whose kind satisfies `predicate`.
    pub fn find_child(
        &self,
        id: NodeId,
        predicate: impl Fn(&NodeKind) -> bool,
    ) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| predicate(self.kind(*child)))
    }

    /// Returns the `SelectorList` of a rule.
    pub fn selector_list(&self, rule: NodeId) -> Option<NodeId> {
        self.find_child(rule, |kind| matches!(kind, NodeKind::SelectorList))
    }

    /// Returns the `Block` of a rule or at-rule.
    pub fn block(&self, id: NodeId) -> Option<NodeId> {
        self.find_child(id, |kind| matches!(kind, NodeKind::Block { .. }))
    }

    /// Returns the `Prelude` of an at-rule.
    pub fn prelude(&self, at_rule: NodeId) -> Option<NodeId> {
        self.find_child(at_rule, |kind| matches!(kind, NodeKind::Prelude))
    }

    /// Returns the `Value` of a declaration.
    pub fn value(&self, declaration: NodeId) -> Option<NodeId> {
        self.find_child(declaration, |kind| matches!(kind, NodeKind::Value))
    }

    /// Returns the nearest enclosing `AtRule` of `id`.
    pub fn enclosing_at_rule(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|ancestor| self.kind(*ancestor).is_at_rule())
    }

    /// Returns the `Selector` nodes of a rule, in order.
    pub fn selectors(&self, rule: NodeId) -> Vec<NodeId> {
        self.selector_list(rule)
            .map(|list| self.children(list).to_vec())
            .unwrap_or_default()
    }

    /// Returns the block contents mode of a `Block` node.
    pub fn block_contents(&self, block: NodeId) -> Option<BlockContents> {
        match self.kind(block) {
            NodeKind::Block { contents } => Some(*contents),
            _ => None,
        }
    }

    /// Returns `true` if a rule has no selectors or no declarations left.
    /// Comments don't count as content.
    pub fn rule_is_empty(&self, rule: NodeId) -> bool {
        let has_selectors = self
            .selector_list(rule)
            .is_some_and(|list| !self.children(list).is_empty());
        let has_body = self
            .block(rule)
            .is_some_and(|block| self.has_content(block));
        !(has_selectors && has_body)
    }

    /// Returns `true` if an at-rule has a block and that block holds
    /// nothing but comments.
    ///
    /// Block-less at-rules (`@import ...;`) are never considered empty.
    pub fn at_rule_is_empty(&self, at_rule: NodeId) -> bool {
        self.block(at_rule)
            .is_some_and(|block| !self.has_content(block))
    }

    fn has_content(&self, block: NodeId) -> bool {
        self.children(block)
            .iter()
            .any(|child| !self.kind(*child).is_comment())
    }
}

/// Pre-order iterator returned by [`StyleTree::descendants`].
pub struct Descendants<'tree> {
    tree: &'tree StyleTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Iterator returned by [`StyleTree::ancestors`].
pub struct Ancestors<'tree> {
    tree: &'tree StyleTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.parent(id);
        Some(id)
    }
}
