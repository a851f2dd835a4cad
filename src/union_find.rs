use std::hash::Hash;

use crate::node::*;
use crate::PQRTree;

/// Membership of a node in the union-find forest over the children of Q- and R-nodes.
///
/// Only a group representative stores the structural parent; every other member
/// reaches it through `find`. Children of P-nodes are singleton groups.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Membership {
    pub(crate) parent: Option<usize>,
    pub(crate) representative: usize,
    pub(crate) rank: usize,
}

impl Membership {
    pub(crate) fn new(idx: usize) -> Membership {
        Membership { parent: None, representative: idx, rank: 0 }
    }
}

impl<T: Copy + Eq + Hash> PQRTree<T> {
    fn find(&mut self, idx: usize) -> usize {
        let mut root = idx;
        while self.nodes[root].uf.representative != root {
            root = self.nodes[root].uf.representative;
        }

        let mut current = idx;
        while self.nodes[current].uf.representative != current {
            let next = self.nodes[current].uf.representative;
            self.nodes[current].uf.representative = root;
            current = next;
        }

        root
    }

    /// Structural parent, resolved through the representative of the node's group.
    pub(crate) fn parent_of(&mut self, idx: usize) -> Option<usize> {
        let representative = self.find(idx);
        self.nodes[representative].uf.parent
    }

    /// Must be called before `parent` counts `idx` among its children.
    pub(crate) fn set_parent(&mut self, idx: usize, parent: Option<usize>) {
        let uf = match parent {
            None => Membership { parent: None, representative: idx, ..self.nodes[idx].uf },
            Some(p) => {
                let internal = self.nodes[p].node.as_internal();
                if internal.kind == NodeType::P || internal.child_count == 0 {
                    Membership { parent: Some(p), representative: idx, ..self.nodes[idx].uf }
                } else {
                    let representative = internal.representative_child.expect("Q-node children without representative");
                    Membership { parent: None, representative, ..self.nodes[idx].uf }
                }
            }
        };
        self.nodes[idx].uf = uf;
    }

    /// Colors a node and queues gray or black nodes on their parent's worklist.
    pub(crate) fn set_color(&mut self, idx: usize, color: Color) {
        self.nodes[idx].red.color = color;

        if color != Color::White {
            let parent = self.parent_of(idx).expect("colored node has no parent");
            self.nodes[parent].red.colored[color].push_back(idx);
        }
    }

    /// Merges the children group of `child` into the children group of `parent`, by rank.
    pub(crate) fn union_children(&mut self, parent: usize, child: usize) {
        let child_rep = self.nodes[child].node.as_internal().representative_child.expect("Q-node without children");
        let parent_rep = self.nodes[parent].node.as_internal().representative_child.expect("Q-node without children");
        debug_assert_ne!(child_rep, parent_rep);

        let child_rank = self.nodes[child_rep].uf.rank;
        let parent_rank = self.nodes[parent_rep].uf.rank;

        if child_rank > parent_rank {
            self.nodes[parent_rep].uf.representative = child_rep;
            self.nodes[child_rep].uf.parent = Some(parent);
            self.nodes[parent].node.as_mut_internal().representative_child = Some(child_rep);
        } else {
            self.nodes[child_rep].uf.representative = parent_rep;
            if child_rank == parent_rank {
                self.nodes[parent_rep].uf.rank += 1;
            }
        }
    }

    pub(crate) fn all_children_black(&self, idx: usize) -> bool {
        match self.nodes[idx].node {
            Node::L => true,
            Node::Internal(internal) => self.nodes[idx].red.colored[Color::Black].len() == internal.child_count,
        }
    }
}
