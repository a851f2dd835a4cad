use std::hash::Hash;

use crate::node::*;
use crate::PQRTree;

/// Children of an internal node in sibling-list order, from its first child.
pub(crate) struct Children<'a, T>
where
    T: Copy + Eq + Hash,
{
    tree: &'a PQRTree<T>,
    previous: Option<usize>,
    current: Option<usize>,
}

impl<'a, T: Copy + Eq + Hash> Iterator for Children<'a, T> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.current?;
        self.current = self.tree.next_sibling(current, self.previous);
        self.previous = Some(current);
        Some(current)
    }
}

impl<T: Copy + Eq + Hash> PQRTree<T> {
    /// Sibling of `idx` on the side opposite to `previous`. Sibling links carry no
    /// direction, so it is always derived from where the traversal came from.
    pub(crate) fn next_sibling(&self, idx: usize, previous: Option<usize>) -> Option<usize> {
        let [s0, s1] = self.nodes[idx].siblings;
        if s0 == previous {
            s1
        } else {
            s0
        }
    }

    pub(crate) fn children(&self, idx: usize) -> Children<'_, T> {
        Children { tree: self, previous: None, current: self.nodes[idx].node.as_internal().first }
    }

    /// Color of an optional node, `None` being lighter than white.
    pub(crate) fn shade(&self, idx: Option<usize>) -> Option<Color> {
        idx.map(|i| self.nodes[i].red.color)
    }

    pub(crate) fn first_child(&self, idx: usize) -> usize {
        self.nodes[idx].node.as_internal().first.expect("internal node without children")
    }

    pub(crate) fn last_child(&self, idx: usize) -> usize {
        self.nodes[idx].node.as_internal().last.expect("internal node without children")
    }

    /// Points the link of `idx` that held `old` at `new`.
    pub(crate) fn relink(&mut self, idx: usize, old: Option<usize>, new: Option<usize>) {
        let siblings = &mut self.nodes[idx].siblings;
        if siblings[0] == old {
            siblings[0] = new;
        } else {
            siblings[1] = new;
        }
    }

    fn queue_colored_child(&mut self, parent: usize, child: usize) {
        let color = self.nodes[child].red.color;
        if color != Color::White {
            self.nodes[parent].red.colored[color].push_back(child);
        }
    }

    fn count_new_child(&mut self, parent: usize, child: usize) {
        let internal = self.nodes[parent].node.as_mut_internal();
        debug_assert!(!internal.deleted, "insertion into deleted node {parent}");
        internal.child_count += 1;

        if internal.child_count == 1 {
            internal.first = Some(child);
            internal.last = Some(child);
            if internal.kind != NodeType::P {
                internal.representative_child = Some(child);
            }
        }
    }

    /// Adds a detached node as the first child of `parent`.
    pub(crate) fn insert_beginning(&mut self, parent: usize, v: usize) {
        self.set_parent(v, Some(parent));

        let first = self.nodes[parent].node.as_internal().first;
        self.nodes[v].siblings = [None, first];
        if let Some(first) = first {
            self.relink(first, None, Some(v));
        }

        self.count_new_child(parent, v);
        self.nodes[parent].node.as_mut_internal().first = Some(v);
        self.queue_colored_child(parent, v);
    }

    /// Adds a detached node as the last child of `parent`.
    pub(crate) fn insert_end(&mut self, parent: usize, v: usize) {
        self.set_parent(v, Some(parent));

        let last = self.nodes[parent].node.as_internal().last;
        self.nodes[v].siblings = [last, None];
        if let Some(last) = last {
            self.relink(last, None, Some(v));
        }

        self.count_new_child(parent, v);
        self.nodes[parent].node.as_mut_internal().last = Some(v);
        self.queue_colored_child(parent, v);
    }

    /// Adds a detached node between the adjacent children `i` and `j` of `parent`,
    /// `None` standing for the end of the list.
    pub(crate) fn insert_between(&mut self, parent: usize, v: usize, i: Option<usize>, j: Option<usize>) {
        self.nodes[v].siblings = [i, j];

        for (near, far) in [(i, j), (j, i)] {
            match near {
                Some(near) => self.relink(near, far, Some(v)),
                None => {
                    let internal = self.nodes[parent].node.as_mut_internal();
                    if far.is_some() && far == internal.first {
                        internal.first = Some(v);
                    } else if far.is_none() && internal.first.is_none() {
                        internal.first = Some(v);
                    } else {
                        internal.last = Some(v);
                    }
                }
            }
        }

        self.set_parent(v, Some(parent));
        let internal = self.nodes[parent].node.as_mut_internal();
        debug_assert!(!internal.deleted, "insertion into deleted node {parent}");
        internal.child_count += 1;
        if internal.child_count == 1 && internal.kind != NodeType::P {
            internal.representative_child = Some(v);
        }
        self.queue_colored_child(parent, v);
    }

    /// Unlinks `v` from the children of `parent`. Worklists are left as they are.
    pub(crate) fn remove_child(&mut self, parent: usize, v: usize) {
        let [v0, v1] = self.nodes[v].siblings;

        for (near, far) in [(v0, v1), (v1, v0)] {
            match near {
                Some(near) => self.relink(near, Some(v), far),
                None => {
                    let internal = self.nodes[parent].node.as_mut_internal();
                    if internal.first == Some(v) {
                        internal.first = far;
                    }
                    if internal.last == Some(v) {
                        internal.last = far;
                    }
                }
            }
        }

        self.nodes[parent].node.as_mut_internal().child_count -= 1;
        self.nodes[v].siblings = [None, None];
    }

    /// Detaches an internal node from the tree. It stays in the arena as a union-find vertex.
    pub(crate) fn destroy(&mut self, v: usize) {
        if let Some(parent) = self.parent_of(v) {
            self.remove_child(parent, v);
        }
        self.nodes[v].node.as_mut_internal().deleted = true;
    }

    pub(crate) fn reverse(&mut self, v: usize) {
        let internal = self.nodes[v].node.as_mut_internal();
        (internal.first, internal.last) = (internal.last, internal.first);
    }
}
