use enum_map::Enum;

/// Kind of an internal node.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub(crate) enum NodeType {
    /// Children may be permuted freely.
    P,
    /// Children order is fixed up to reversal.
    Q,
    /// Children admit no consecutive arrangement for the current constraints.
    R,
}

/// Reduction color. The declaration order is the shading order used for tie-breaking.
#[derive(Debug, Enum, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Default)]
pub(crate) enum Color {
    #[default]
    White,
    Gray,
    Black,
}

#[derive(Copy, Clone, Debug)]
pub(crate) enum Node {
    Internal(InternalNode),
    L,
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct InternalNode {
    pub(crate) kind: NodeType,
    pub(crate) first: Option<usize>,
    pub(crate) last: Option<usize>,
    pub(crate) child_count: usize,
    /// Union-find root of the children group, Q- and R-nodes only.
    pub(crate) representative_child: Option<usize>,
    /// Detached from the tree, kept as a union-find vertex.
    pub(crate) deleted: bool,
}

impl InternalNode {
    pub(crate) fn new(kind: NodeType) -> InternalNode {
        InternalNode { kind, first: None, last: None, child_count: 0, representative_child: None, deleted: false }
    }
}

impl Node {
    pub(crate) fn as_internal(&self) -> &InternalNode {
        if let Node::Internal(internal) = self {
            internal
        } else {
            panic!("Not an internal node: {:?}!", self);
        }
    }

    pub(crate) fn as_mut_internal(&mut self) -> &mut InternalNode {
        if let Node::Internal(internal) = self {
            internal
        } else {
            panic!("Not an internal node: {:?}!", self);
        }
    }

    pub(crate) fn kind(&self) -> NodeType {
        self.as_internal().kind
    }
}
