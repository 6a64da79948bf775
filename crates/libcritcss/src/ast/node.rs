use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ByteSpan;

/// A single node of a [`StyleTree`](crate::ast::StyleTree).
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    /// Source span for parsed nodes; `None` for synthesized ones.
    pub(crate) span: Option<ByteSpan>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Set once the node (or any descendant) has been mutated.
    pub(crate) modified: bool,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, span: Option<ByteSpan>) -> Self {
        Self {
            kind,
            span,
            parent: None,
            children: Vec::new(),
            modified: false,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn span(&self) -> Option<ByteSpan> {
        self.span
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns `true` if this node (or one of its descendants) was
    /// mutated since parsing.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns `true` if this node will serialize as its original source
    /// text.
    pub fn is_pristine(&self) -> bool {
        !self.modified && self.span.is_some()
    }
}
