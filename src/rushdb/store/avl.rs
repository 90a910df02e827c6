// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Arena-backed AVL tree with subtree counts.
//!
//! Nodes live in a slab and are addressed by stable `u32` ids, which lets
//! sibling structures (the sorted-set hash index) reference tree nodes
//! without sharing ownership. Each node tracks `height` for balancing and
//! `cnt` (subtree size) for rank-offset walks.
//!
//! Ordering is the caller's concern: descent for insertion and seeking is
//! driven from outside through the link accessors, the tree only restores
//! balance and bookkeeping.

/// Node handle. Valid from `alloc` until `dealloc`.
pub type NodeId = u32;

struct AvlNode<T> {
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    height: u32,
    cnt: u32,
    data: T,
}

pub struct AvlTree<T> {
    nodes: Vec<Option<AvlNode<T>>>,
    free: Vec<NodeId>,
}

impl<T> AvlTree<T> {
    pub fn new() -> Self {
        AvlTree {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocates a detached singleton node (height 1, cnt 1).
    pub fn alloc(&mut self, data: T) -> NodeId {
        let node = AvlNode {
            parent: None,
            left: None,
            right: None,
            height: 1,
            cnt: 1,
            data,
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id as usize] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                (self.nodes.len() - 1) as NodeId
            }
        }
    }

    /// Releases a node slot and returns its payload.
    ///
    /// The node must already be detached from the tree (see `remove`).
    pub fn dealloc(&mut self, id: NodeId) -> T {
        let node = self.nodes[id as usize]
            .take()
            .expect("dealloc of a live node");
        self.free.push(id);
        node.data
    }

    fn node(&self, id: NodeId) -> &AvlNode<T> {
        self.nodes[id as usize].as_ref().expect("live node")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut AvlNode<T> {
        self.nodes[id as usize].as_mut().expect("live node")
    }

    pub fn data(&self, id: NodeId) -> &T {
        &self.node(id).data
    }

    pub fn data_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.node_mut(id).data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    /// Height of a possibly absent subtree.
    pub fn height(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |n| self.node(n).height)
    }

    /// Node count of a possibly absent subtree.
    pub fn count(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |n| self.node(n).cnt)
    }

    /// Attaches `child` as the left child of `parent`. The slot must be free.
    pub fn link_left(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.node(parent).left.is_none());
        self.node_mut(parent).left = Some(child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Attaches `child` as the right child of `parent`. The slot must be free.
    pub fn link_right(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.node(parent).right.is_none());
        self.node_mut(parent).right = Some(child);
        self.node_mut(child).parent = Some(parent);
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.node_mut(id).parent = parent;
    }

    fn set_left(&mut self, id: NodeId, child: Option<NodeId>) {
        self.node_mut(id).left = child;
    }

    fn set_right(&mut self, id: NodeId, child: Option<NodeId>) {
        self.node_mut(id).right = child;
    }

    fn update(&mut self, id: NodeId) {
        let h = 1 + self.height(self.left(id)).max(self.height(self.right(id)));
        let c = 1 + self.count(self.left(id)) + self.count(self.right(id));
        let node = self.node_mut(id);
        node.height = h;
        node.cnt = c;
    }

    fn rotate_left(&mut self, node: NodeId) -> NodeId {
        let parent = self.parent(node);
        let new_node = self.right(node).expect("rotate_left requires a right child");
        let inner = self.left(new_node);

        self.set_right(node, inner);
        if let Some(i) = inner {
            self.set_parent(i, Some(node));
        }
        self.set_parent(new_node, parent);
        self.set_left(new_node, Some(node));
        self.set_parent(node, Some(new_node));

        self.update(node);
        self.update(new_node);
        new_node
    }

    fn rotate_right(&mut self, node: NodeId) -> NodeId {
        let parent = self.parent(node);
        let new_node = self.left(node).expect("rotate_right requires a left child");
        let inner = self.right(new_node);

        self.set_left(node, inner);
        if let Some(i) = inner {
            self.set_parent(i, Some(node));
        }
        self.set_parent(new_node, parent);
        self.set_right(new_node, Some(node));
        self.set_parent(node, Some(new_node));

        self.update(node);
        self.update(new_node);
        new_node
    }

    // left subtree is taller by 2
    fn fix_left(&mut self, node: NodeId) -> NodeId {
        let l = self.left(node).expect("left-heavy node has a left child");
        if self.height(self.left(l)) < self.height(self.right(l)) {
            let rotated = self.rotate_left(l);
            self.set_left(node, Some(rotated));
        }
        self.rotate_right(node)
    }

    // right subtree is taller by 2
    fn fix_right(&mut self, node: NodeId) -> NodeId {
        let r = self.right(node).expect("right-heavy node has a right child");
        if self.height(self.right(r)) < self.height(self.left(r)) {
            let rotated = self.rotate_right(r);
            self.set_right(node, Some(rotated));
        }
        self.rotate_left(node)
    }

    /// Restores height/cnt bookkeeping and balance from `id` to the root.
    ///
    /// ## Output
    /// - `NodeId`: The (possibly new) root of the whole tree
    ///
    /// Call after linking a freshly inserted node or after detaching one.
    pub fn fix(&mut self, mut id: NodeId) -> NodeId {
        loop {
            self.update(id);
            let l = self.height(self.left(id));
            let r = self.height(self.right(id));
            let parent = self.parent(id);
            let was_left = parent.map(|p| self.left(p) == Some(id));

            let fixed = if l == r + 2 {
                self.fix_left(id)
            } else if l + 2 == r {
                self.fix_right(id)
            } else {
                id
            };

            match parent {
                None => return fixed,
                Some(p) => {
                    if fixed != id {
                        if was_left == Some(true) {
                            self.set_left(p, Some(fixed));
                        } else {
                            self.set_right(p, Some(fixed));
                        }
                    }
                    id = p;
                }
            }
        }
    }

    // splices out a node with at most one child and rebalances upward
    fn detach_simple(&mut self, id: NodeId) -> Option<NodeId> {
        let child = self.left(id).or_else(|| self.right(id));
        let parent = self.parent(id);
        if let Some(c) = child {
            self.set_parent(c, parent);
        }
        match parent {
            None => child,
            Some(p) => {
                if self.left(p) == Some(id) {
                    self.set_left(p, child);
                } else {
                    self.set_right(p, child);
                }
                Some(self.fix(p))
            }
        }
    }

    /// Unlinks `id` from the tree.
    ///
    /// ## Output
    /// - `Option<NodeId>`: The new root (None when the tree became empty)
    ///
    /// ## Behaviour
    /// - A node with at most one child is spliced out directly
    /// - A node with two children is replaced by its in-order successor,
    ///   which inherits the node's links field by field
    /// - `id` itself stays allocated as a detached singleton so it can be
    ///   relinked (score update) or freed with `dealloc`
    pub fn remove(&mut self, id: NodeId) -> Option<NodeId> {
        let new_root = if self.left(id).is_none() || self.right(id).is_none() {
            self.detach_simple(id)
        } else {
            let mut succ = self.right(id).expect("two-child node has a right child");
            while let Some(l) = self.left(succ) {
                succ = l;
            }
            let root = self.detach_simple(succ);

            // the detach may have rebalanced ancestors, so read the links now
            let (parent, left, right, height, cnt) = {
                let n = self.node(id);
                (n.parent, n.left, n.right, n.height, n.cnt)
            };
            {
                let s = self.node_mut(succ);
                s.parent = parent;
                s.left = left;
                s.right = right;
                s.height = height;
                s.cnt = cnt;
            }
            if let Some(l) = left {
                self.set_parent(l, Some(succ));
            }
            if let Some(r) = right {
                self.set_parent(r, Some(succ));
            }
            match parent {
                None => Some(succ),
                Some(p) => {
                    if self.left(p) == Some(id) {
                        self.set_left(p, Some(succ));
                    } else {
                        self.set_right(p, Some(succ));
                    }
                    root
                }
            }
        };

        let n = self.node_mut(id);
        n.parent = None;
        n.left = None;
        n.right = None;
        n.height = 1;
        n.cnt = 1;
        new_root
    }

    /// Walks to the node `offset` positions away in in-order sequence.
    ///
    /// ## Output
    /// - `Option<NodeId>`: The target node, or None when out of range
    ///
    /// ## Performance
    /// - O(log n): rank deltas are bounded by tree height both descending
    ///   and ascending
    pub fn offset(&self, id: NodeId, offset: i64) -> Option<NodeId> {
        let mut pos: i64 = 0;
        let mut node = id;
        while offset != pos {
            let right_cnt = i64::from(self.count(self.right(node)));
            let left_cnt = i64::from(self.count(self.left(node)));
            if pos < offset && pos + right_cnt >= offset {
                node = self.right(node).expect("right subtree is non-empty");
                pos += i64::from(self.count(self.left(node))) + 1;
            } else if pos > offset && pos - left_cnt <= offset {
                node = self.left(node).expect("left subtree is non-empty");
                pos -= i64::from(self.count(self.right(node))) + 1;
            } else {
                let parent = match self.parent(node) {
                    Some(p) => p,
                    None => return None,
                };
                if self.right(parent) == Some(node) {
                    pos -= i64::from(self.count(self.left(node))) + 1;
                } else {
                    pos += i64::from(self.count(self.right(node))) + 1;
                }
                node = parent;
            }
        }
        Some(node)
    }
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        AvlTree::new()
    }
}
