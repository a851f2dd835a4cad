use std::collections::{HashSet, VecDeque};
use std::fmt::{Display, Formatter};
use std::hash::Hash;

use bimap::BiMap;
use enum_map::EnumMap;
use log::debug;

use crate::errors::*;
use crate::node::*;
use crate::union_find::Membership;

/// Incrementally reduced PQR-tree over a fixed set of leaves.
///
/// The tree represents every arrangement of its leaves in which each constraint
/// passed to [`PQRTree::reduce`] occupies a contiguous range.
#[derive(Debug, Clone)]
pub struct PQRTree<T>
where
    T: Copy + Eq + Hash,
{
    pub(crate) nodes: Vec<TreeNode>,
    pub(crate) root: usize,
    pub(crate) leaves: BiMap<T, usize>,
}

#[derive(Debug, Clone)]
pub(crate) struct TreeNode {
    pub(crate) node: Node,
    /// Unordered pair of adjacent siblings, walked with `next_sibling`.
    pub(crate) siblings: [Option<usize>; 2],
    pub(crate) uf: Membership,
    pub(crate) red: ReductionInfo,
}

/// Per-call state, reset by `uncolor` before `reduce` returns.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReductionInfo {
    pub(crate) color: Color,
    pub(crate) visited: bool,
    pub(crate) pertinent_child_count: usize,
    pub(crate) pertinent_leaf_count: usize,
    /// Gray and black children worklists, filled by `set_color`. The white entry stays empty.
    pub(crate) colored: EnumMap<Color, VecDeque<usize>>,
}

impl ReductionInfo {
    pub(crate) fn clean_up(&mut self) {
        self.color = Color::White;
        self.visited = false;
        self.pertinent_child_count = 0;
        self.pertinent_leaf_count = 0;
        self.colored.values_mut().for_each(VecDeque::clear);
    }

    #[cfg(test)]
    pub(crate) fn is_clean(&self) -> bool {
        self.color == Color::White
            && !self.visited
            && self.pertinent_child_count == 0
            && self.pertinent_leaf_count == 0
            && self.colored.values().all(VecDeque::is_empty)
    }
}

impl TreeNode {
    fn new(idx: usize, node: Node) -> TreeNode {
        TreeNode { node, siblings: [None, None], uf: Membership::new(idx), red: ReductionInfo::default() }
    }
}

impl PQRTree<usize> {
    /// Universal tree over the leaves `0..n`.
    pub fn new(n: usize) -> PQRTree<usize> {
        PQRTree::from_leaves(&(0..n).collect::<Vec<usize>>()).expect("labels 0..n are distinct")
    }
}

impl<T: Copy + Eq + Hash> PQRTree<T> {
    /// Universal tree: a single P-node holding every leaf in the given order.
    pub fn from_leaves(initial: &[T]) -> Result<PQRTree<T>, ConstructionError<T>> {
        let mut tree = PQRTree { nodes: Vec::with_capacity(initial.len() + 1), root: 0, leaves: BiMap::new() };

        let root = tree.add_node(Node::Internal(InternalNode::new(NodeType::P)));
        tree.root = root;

        for &label in initial {
            let leaf = tree.add_node(Node::L);
            tree.leaves.insert_no_overwrite(label, leaf).map_err(|e| ConstructionError::DuplicateLeaf(e.0))?;
            tree.insert_end(root, leaf);
        }

        Ok(tree)
    }

    /// Restricts the tree so that the leaves of `s` are consecutive in every represented arrangement.
    ///
    /// Constraints with fewer than two leaves are accepted and change nothing. Unknown or
    /// repeated labels are rejected before the tree is touched.
    pub fn reduce(&mut self, s: &[T]) -> Result<(), ReductionError<T>> {
        let mut s_nodes = Vec::with_capacity(s.len());
        let mut seen = HashSet::with_capacity(s.len());
        for leaf in s {
            match self.leaves.get_by_left(leaf) {
                Some(&node) => {
                    if !seen.insert(node) {
                        return Err(ReductionError::DuplicateLeaf(*leaf));
                    }
                    s_nodes.push(node);
                }
                None => return Err(ReductionError::LeafNotFound(*leaf)),
            };
        }

        if s_nodes.len() < 2 {
            return Ok(());
        }

        let mut visited = VecDeque::new();
        let lca = self.bubble(&s_nodes, &mut visited);
        let lca = self.repair_gray(lca);
        self.adjust(lca);
        self.uncolor(&s_nodes, visited);

        debug!("reduced {} leaves, pertinent root {} ({:?})", s_nodes.len(), lca, self.nodes[lca].node.kind());
        Ok(())
    }

    pub(crate) fn add_node(&mut self, node: Node) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(TreeNode::new(idx, node));
        idx
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// `true` for the tree over no leaves, rendered as `()`.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// `false` once some reduction had to build an R-node, i.e. the constraints
    /// reduced so far cannot all be consecutive at once.
    pub fn is_feasible(&self) -> bool {
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            if let Node::Internal(internal) = self.nodes[idx].node {
                if internal.kind == NodeType::R {
                    return false;
                }
                stack.extend(self.children(idx));
            }
        }
        true
    }

    fn collect_frontier(&self, mut v: Vec<T>, root: usize) -> Vec<T> {
        match self.nodes[root].node {
            Node::Internal(_) => {
                for child in self.children(root) {
                    v = self.collect_frontier(v, child);
                }
            }
            Node::L => v.push(*self.leaves.get_by_right(&root).expect("broken leaves map")),
        };
        v
    }

    /// Leaves in rendering order. Unless the tree holds an R-node this arrangement
    /// keeps every reduced constraint consecutive.
    pub fn frontier(&self) -> Vec<T> {
        self.collect_frontier(Vec::with_capacity(self.leaves.len()), self.root)
    }
}

impl<T: Copy + Eq + Hash + Display> Display for PQRTree<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fn node_fmt<T>(tree: &PQRTree<T>, idx: usize, f: &mut Formatter<'_>) -> std::fmt::Result
        where
            T: Copy + Eq + Hash + Display,
        {
            match &tree.nodes[idx].node {
                Node::Internal(internal) => {
                    let (open, close) = match internal.kind {
                        NodeType::P => ('(', ')'),
                        NodeType::Q => ('[', ']'),
                        NodeType::R => ('{', '}'),
                    };

                    write!(f, "{open}")?;
                    for (i, child) in tree.children(idx).enumerate() {
                        if i > 0 {
                            write!(f, " ")?;
                        }
                        node_fmt(tree, child, f)?;
                    }
                    write!(f, "{close}")?;
                }
                Node::L => {
                    write!(f, "{}", tree.leaves.get_by_right(&idx).expect("broken leaves map"))?;
                }
            };

            Ok(())
        }

        node_fmt(self, self.root, f)
    }
}
