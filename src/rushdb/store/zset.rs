// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Sorted set: (name, score) members ordered by (score, name).
//!
//! One arena node per member backs both views: the AVL tree gives ordered
//! range walks with rank offsets, the hash index gives O(1) lookup by name.
//! Scores tie-break on the raw name bytes, compared unsigned.

use crate::rushdb::store::avl::{AvlTree, NodeId};
use crate::rushdb::store::hashmap::{str_hash, HMap};

/// One sorted-set member.
pub struct ZNode {
    pub name: Vec<u8>,
    pub score: f64,
    pub hcode: u64,
}

#[derive(Default)]
pub struct ZSet {
    tree: AvlTree<ZNode>,
    root: Option<NodeId>,
    index: HMap<NodeId>,
}

impl ZSet {
    pub fn new() -> Self {
        ZSet {
            tree: AvlTree::new(),
            root: None,
            index: HMap::new(),
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// O(1) member lookup through the hash index.
    pub fn lookup(&self, name: &[u8]) -> Option<&ZNode> {
        self.find(name).map(|id| self.tree.data(id))
    }

    /// Adds a member or updates the score of an existing one.
    ///
    /// ## Output
    /// - `bool`: true when the name was new
    ///
    /// ## Behaviour
    /// - A score update unlinks the node from the tree, rewrites the score
    ///   and relinks it; the arena node and hash entry are kept
    pub fn insert(&mut self, name: &[u8], score: f64) -> bool {
        match self.find(name) {
            Some(id) => {
                self.update_score(id, score);
                false
            }
            None => {
                let hcode = str_hash(name);
                let id = self.tree.alloc(ZNode {
                    name: name.to_vec(),
                    score,
                    hcode,
                });
                self.index.insert(hcode, id);
                self.tree_insert(id);
                true
            }
        }
    }

    /// Removes a member by name.
    pub fn delete(&mut self, name: &[u8]) -> bool {
        let id = match self.find(name) {
            Some(id) => id,
            None => return false,
        };
        let hcode = self.tree.data(id).hcode;
        self.index.remove(hcode, |&other| other == id);
        self.root = self.tree.remove(id);
        self.tree.dealloc(id);
        true
    }

    /// Least member whose (score, name) is at or after the probe.
    pub fn seek_ge(&self, score: f64, name: &[u8]) -> Option<NodeId> {
        let mut found = None;
        let mut cur = self.root;
        while let Some(c) = cur {
            let node = self.tree.data(c);
            if Self::key_less(node.score, &node.name, score, name) {
                cur = self.tree.right(c);
            } else {
                found = Some(c);
                cur = self.tree.left(c);
            }
        }
        found
    }

    /// In-order neighbour `delta` positions away.
    pub fn offset(&self, id: NodeId, delta: i64) -> Option<NodeId> {
        self.tree.offset(id, delta)
    }

    pub fn node(&self, id: NodeId) -> &ZNode {
        self.tree.data(id)
    }

    fn find(&self, name: &[u8]) -> Option<NodeId> {
        let hcode = str_hash(name);
        self.index
            .get(hcode, |&id| self.tree.data(id).name == name)
            .copied()
    }

    fn update_score(&mut self, id: NodeId, score: f64) {
        if self.tree.data(id).score == score {
            return;
        }
        self.root = self.tree.remove(id);
        self.tree.data_mut(id).score = score;
        self.tree_insert(id);
    }

    // descend from the root comparing (score, name), then rebalance
    fn tree_insert(&mut self, id: NodeId) {
        let mut cur = self.root;
        let mut parent = None;
        let mut go_left = false;
        while let Some(c) = cur {
            parent = Some(c);
            go_left = Self::node_less(self.tree.data(id), self.tree.data(c));
            cur = if go_left {
                self.tree.left(c)
            } else {
                self.tree.right(c)
            };
        }
        if let Some(p) = parent {
            if go_left {
                self.tree.link_left(p, id);
            } else {
                self.tree.link_right(p, id);
            }
        }
        self.root = Some(self.tree.fix(id));
    }

    fn node_less(a: &ZNode, b: &ZNode) -> bool {
        if a.score != b.score {
            return a.score < b.score;
        }
        a.name < b.name
    }

    fn key_less(s1: f64, n1: &[u8], s2: f64, n2: &[u8]) -> bool {
        if s1 != s2 {
            return s1 < s2;
        }
        n1 < n2
    }
}
