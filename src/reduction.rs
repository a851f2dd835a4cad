use std::collections::VecDeque;
use std::hash::Hash;
use std::mem;

use log::{trace, warn};

use crate::node::*;
use crate::PQRTree;

impl<T: Copy + Eq + Hash> PQRTree<T> {
    /// Colors the pertinent subtree and returns its root, the least common ancestor of `s_nodes`.
    ///
    /// Every internal node marked visited is appended to `visited` for `uncolor`.
    pub(crate) fn bubble(&mut self, s_nodes: &[usize], visited: &mut VecDeque<usize>) -> usize {
        let mut off_the_top = 0usize;
        let mut queue: VecDeque<usize> = s_nodes.to_vec().into();
        s_nodes.iter().for_each(|&leaf| self.nodes[leaf].red.visited = true);

        // count pertinent children until all upward paths meet
        while queue.len() + off_the_top > 1 {
            let x = queue.pop_front().expect("upward paths lost before meeting");

            match self.parent_of(x) {
                None => off_the_top = 1,
                Some(y) => {
                    if !self.nodes[y].red.visited {
                        self.nodes[y].red.visited = true;
                        queue.push_back(y);
                        visited.push_back(y);
                    }
                    self.nodes[y].red.pertinent_child_count += 1;
                }
            }
        }

        // color bottom-up, a node is queued once all of its pertinent children are colored
        queue.clear();
        queue.extend(s_nodes);
        s_nodes.iter().for_each(|&leaf| self.nodes[leaf].red.pertinent_leaf_count = 1);

        while let Some(x) = queue.pop_front() {
            if self.nodes[x].red.pertinent_leaf_count == s_nodes.len() {
                return x;
            }

            let color = if self.all_children_black(x) { Color::Black } else { Color::Gray };
            self.set_color(x, color);

            let y = self.parent_of(x).expect("pertinent node above the pertinent root");
            let leaf_count = self.nodes[x].red.pertinent_leaf_count;
            let red = &mut self.nodes[y].red;
            red.pertinent_child_count -= 1;
            red.pertinent_leaf_count += leaf_count;
            if red.pertinent_child_count == 0 {
                queue.push_back(y);
            }
        }

        panic!("pertinent root not found");
    }

    /// Eliminates every gray child below the pertinent root and returns the final pertinent root.
    pub(crate) fn repair_gray(&mut self, mut lca: usize) -> usize {
        while let Some(v) = self.nodes[lca].red.colored[Color::Gray].pop_front() {
            if self.nodes[lca].node.kind() == NodeType::P {
                let v = if self.nodes[v].node.kind() == NodeType::P { self.transform_p_into_q(v, lca) } else { v };

                self.join_black_children(lca);
                self.move_away_from_lca(lca, v);
                lca = v;
            } else if self.nodes[v].node.kind() == NodeType::P {
                self.merge_p_node(v);
            } else {
                self.merge_into_lca(v);
            }
        }

        lca
    }

    pub(crate) fn adjust(&mut self, lca: usize) {
        match self.nodes[lca].node.kind() {
            NodeType::P => self.join_black_children(lca),
            NodeType::Q => self.adjust_q(lca),
            NodeType::R => {}
        }
    }

    /// Resets the transient state of the leaves of the constraint and of every visited node.
    pub(crate) fn uncolor(&mut self, s_nodes: &[usize], mut visited: VecDeque<usize>) {
        for &leaf in s_nodes {
            self.nodes[leaf].red.clean_up();
            self.clean_up_visited_parent(leaf, &mut visited);
        }

        while let Some(v) = visited.pop_front() {
            self.nodes[v].red.clean_up();
            self.clean_up_visited_parent(v, &mut visited);
        }
    }

    fn clean_up_visited_parent(&mut self, v: usize, visited: &mut VecDeque<usize>) {
        if let Some(p) = self.parent_of(v) {
            if self.nodes[p].red.visited {
                self.nodes[p].red.clean_up();
                visited.push_back(p);
            }
        }
    }

    fn add_visited_node(&mut self, kind: NodeType) -> usize {
        let idx = self.add_node(Node::Internal(InternalNode::new(kind)));
        self.nodes[idx].red.visited = true;
        idx
    }

    /// Moves `blacks` from `from` under the already attached P-node `b` and colors `b` black.
    fn adopt_black_children(&mut self, from: usize, b: usize, blacks: VecDeque<usize>) {
        for bi in blacks {
            self.remove_child(from, bi);
            self.insert_end(b, bi);
        }
        self.set_color(b, Color::Black);
    }

    /// Groups the black children of a P-node under one black P-node, unless there are fewer
    /// than two of them or nothing else.
    fn join_black_children(&mut self, x: usize) {
        let black_count = self.nodes[x].red.colored[Color::Black].len();
        if black_count > 1 && black_count < self.nodes[x].node.as_internal().child_count {
            trace!("joining {black_count} black children of {x}");

            let b = self.add_visited_node(NodeType::P);
            self.insert_end(x, b);
            let blacks = mem::take(&mut self.nodes[x].red.colored[Color::Black]);
            self.adopt_black_children(x, b, blacks);
        }
    }

    /// Replaces the gray P-node `v`, child of the P-node `r`, by a gray Q-node holding its
    /// black run, its gray children and the rest of `v`, in this order.
    fn transform_p_into_q(&mut self, v: usize, r: usize) -> usize {
        trace!("transforming gray P-node {v} into a Q-node");

        let g = self.add_visited_node(NodeType::Q);
        let next = self.nodes[v].siblings[0];
        self.insert_between(r, g, Some(v), next);
        self.set_color(g, Color::Gray);
        // g takes the place of v, which the caller already took off the worklist
        self.nodes[r].red.colored[Color::Gray].pop_back();

        let blacks = mem::take(&mut self.nodes[v].red.colored[Color::Black]);
        if blacks.len() > 1 {
            let b = self.add_visited_node(NodeType::P);
            self.insert_end(g, b);
            self.adopt_black_children(v, b, blacks);
        } else {
            for bi in blacks {
                self.remove_child(v, bi);
                self.insert_end(g, bi);
            }
        }

        for gi in mem::take(&mut self.nodes[v].red.colored[Color::Gray]) {
            self.remove_child(v, gi);
            self.insert_end(g, gi);
        }

        self.set_color(v, Color::White);

        if self.nodes[v].node.as_internal().child_count > 1 {
            self.remove_child(r, v);
            self.insert_end(g, v);
        } else {
            if self.nodes[v].node.as_internal().child_count == 1 {
                let w = self.first_child(v);
                self.remove_child(v, w);
                self.insert_end(g, w);
            }
            self.destroy(v);
        }

        g
    }

    /// Moves the black and gray children of the P-node `lca` into its child `v`, darkest end
    /// first, making `v` the new pertinent root. `lca` is replaced by `v` once `v` is its
    /// only child.
    fn move_away_from_lca(&mut self, lca: usize, v: usize) {
        trace!("moving pertinent children of {lca} into {v}");

        if self.nodes[self.first_child(v)].red.color < self.nodes[self.last_child(v)].red.color {
            self.reverse(v);
        }

        for bi in mem::take(&mut self.nodes[lca].red.colored[Color::Black]) {
            self.remove_child(lca, bi);
            self.insert_beginning(v, bi);
        }

        for gi in mem::take(&mut self.nodes[lca].red.colored[Color::Gray]) {
            if gi != v {
                self.remove_child(lca, gi);
                self.insert_beginning(v, gi);
            }
        }

        self.set_color(v, Color::White);

        if self.nodes[lca].node.as_internal().child_count == 1 {
            self.remove_child(lca, v);
            match self.parent_of(lca) {
                Some(parent) => {
                    let next = self.nodes[lca].siblings[0];
                    self.insert_between(parent, v, Some(lca), next);
                }
                None => {
                    debug_assert_eq!(self.root, lca);
                    self.set_parent(v, None);
                    self.root = v;
                }
            }
            self.destroy(lca);
        }
    }

    /// Splices the black run and gray children of the gray P-node `v` into its Q- or R-parent,
    /// next to `v` on its darker side.
    fn merge_p_node(&mut self, v: usize) {
        trace!("merging gray P-node {v} into its parent");

        let r = self.parent_of(v).expect("gray node has no parent");

        let [s0, s1] = self.nodes[v].siblings;
        let mut darkest = if self.shade(s0) > self.shade(s1) { s0 } else { s1 };

        let blacks = mem::take(&mut self.nodes[v].red.colored[Color::Black]);
        if blacks.len() > 1 {
            let b = self.add_visited_node(NodeType::P);
            self.insert_between(r, b, Some(v), darkest);
            darkest = Some(b);
            self.adopt_black_children(v, b, blacks);
        } else {
            for bi in blacks {
                self.remove_child(v, bi);
                self.insert_between(r, bi, Some(v), darkest);
                darkest = Some(bi);
            }
        }

        for gi in mem::take(&mut self.nodes[v].red.colored[Color::Gray]) {
            self.remove_child(v, gi);
            self.insert_between(r, gi, Some(v), darkest);
            darkest = Some(gi);
        }

        self.set_color(v, Color::White);

        let remaining = self.nodes[v].node.as_internal().child_count;
        if remaining <= 1 {
            if remaining == 1 {
                let w = self.first_child(v);
                self.remove_child(v, w);
                self.insert_between(r, w, Some(v), darkest);
            }
            self.destroy(v);
        }
    }

    /// Replaces the gray Q- or R-node `v` by its children inside its Q- or R-parent, oriented
    /// so that the darker end of `v` faces the darker neighbor.
    fn merge_into_lca(&mut self, v: usize) {
        let r = self.parent_of(v).expect("gray node has no parent");
        trace!("merging gray node {v} into {r}");

        self.union_children(r, v);

        let [s0, s1] = self.nodes[v].siblings;
        let (out_lighter, out_darker) = if self.shade(s0) > self.shade(s1) { (s1, s0) } else { (s0, s1) };

        let (first, last) = (self.first_child(v), self.last_child(v));
        let (lighter_end, darker_end) =
            if self.nodes[first].red.color < self.nodes[last].red.color { (first, last) } else { (last, first) };

        self.splice_end(r, v, lighter_end, out_lighter);
        self.splice_end(r, v, darker_end, out_darker);

        if self.nodes[v].node.kind() == NodeType::R && self.nodes[r].node.kind() == NodeType::Q {
            warn!("merged R-node {v} turns {r} into an R-node");
            self.nodes[r].node.as_mut_internal().kind = NodeType::R;
        }

        let merged_count = self.nodes[v].node.as_internal().child_count;
        self.nodes[r].node.as_mut_internal().child_count += merged_count - 1;

        for (color, children) in mem::take(&mut self.nodes[v].red.colored) {
            self.nodes[r].red.colored[color].extend(children);
        }

        let merged = self.nodes[v].node.as_mut_internal();
        merged.first = None;
        merged.last = None;
        merged.child_count = 0;
        merged.deleted = true;
        self.nodes[v].siblings = [None, None];
    }

    /// Links the end child `end` of `v` to `out`, the neighbor of `v` inside `r`.
    fn splice_end(&mut self, r: usize, v: usize, end: usize, out: Option<usize>) {
        self.relink(end, None, out);
        match out {
            Some(out) => self.relink(out, Some(v), Some(end)),
            None => {
                let internal = self.nodes[r].node.as_mut_internal();
                if internal.first == Some(v) {
                    internal.first = Some(end);
                } else {
                    internal.last = Some(end);
                }
            }
        }
    }

    /// Turns a Q pertinent root into an R-node when its black children do not form a single run.
    fn adjust_q(&mut self, lca: usize) {
        let white_boundaries: usize = self.nodes[lca].red.colored[Color::Black]
            .iter()
            .map(|&b| self.nodes[b].siblings.iter().filter(|&&s| self.shade(s) <= Some(Color::White)).count())
            .sum();

        if white_boundaries > 2 {
            warn!("black children of {lca} are not consecutive, Q-node becomes an R-node");
            self.nodes[lca].node.as_mut_internal().kind = NodeType::R;
        }
    }
}
