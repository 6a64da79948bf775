use crate::ast::Node;
use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::ByteSpan;
use inherent::inherent;

/// Trait implemented by tree views that can reconstruct CSS text.
///
/// # Source Reconstruction Modes
///
/// - **Source-slice mode (fast, lossless):** When `source` is `Some(s)`,
///   pristine nodes are emitted by slicing `s` with their byte span.
///
/// - **Structural mode (compact):** Modified nodes, synthesized nodes, and
///   every node when `source` is `None`, are rebuilt from their semantic
///   data. The output is semantically equivalent but not
///   formatting-identical.
pub trait AstNode {
    /// Append this node's CSS text to `sink`.
    fn append_source(&self, sink: &mut String, source: Option<&str>);

    /// Return this node as a CSS string.
    ///
    /// Convenience wrapper around [`append_source`](AstNode::append_source).
    fn to_source(&self, source: Option<&str>) -> String {
        let mut s = String::new();
        self.append_source(&mut s, source);
        s
    }
}

/// A borrowed view of one node together with the tree that owns it.
///
/// ```
/// use libcritcss::ast::AstNode;
/// use libcritcss::CssParser;
///
/// let source = "a { color: red }";
/// let tree = CssParser::new(source).parse_stylesheet().into_ast().unwrap();
/// let rule = tree.rule_ids().next().unwrap();
/// let node = tree.node_ref(rule);
/// assert_eq!(node.kind().label(), "Rule");
/// assert_eq!(node.to_source(Some(source)), "a { color: red }");
/// ```
#[derive(Clone, Copy)]
pub struct NodeRef<'tree> {
    tree: &'tree StyleTree,
    id: NodeId,
}

impl<'tree> NodeRef<'tree> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'tree StyleTree {
        self.tree
    }

    pub fn node(&self) -> &'tree Node {
        self.tree.node(self.id)
    }

    pub fn kind(&self) -> &'tree NodeKind {
        self.tree.kind(self.id)
    }

    pub fn span(&self) -> Option<ByteSpan> {
        self.tree.span(self.id)
    }

    pub fn parent(&self) -> Option<NodeRef<'tree>> {
        self.tree.parent(self.id).map(|id| self.tree.node_ref(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'tree>> + 'tree {
        let tree = self.tree;
        tree.children(self.id).iter().map(move |id| tree.node_ref(*id))
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", self.kind())
            .field("span", &self.span())
            .finish()
    }
}

#[inherent]
impl AstNode for NodeRef<'_> {
    pub fn append_source(&self, sink: &mut String, source: Option<&str>) {
        self.tree.append_css(self.id, sink, source);
    }
}

impl StyleTree {
    /// Returns a borrowed view of `id`.
    pub fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }
}
