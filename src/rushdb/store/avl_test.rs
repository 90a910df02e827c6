// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::rushdb::store::avl::{AvlTree, NodeId};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn insert(tree: &mut AvlTree<u32>, root: &mut Option<NodeId>, value: u32) {
        let id = tree.alloc(value);
        let mut cur = *root;
        let mut parent = None;
        let mut go_left = false;
        while let Some(c) = cur {
            parent = Some(c);
            go_left = value < *tree.data(c);
            cur = if go_left { tree.left(c) } else { tree.right(c) };
        }
        if let Some(p) = parent {
            if go_left {
                tree.link_left(p, id);
            } else {
                tree.link_right(p, id);
            }
        }
        *root = Some(tree.fix(id));
    }

    fn find(tree: &AvlTree<u32>, root: Option<NodeId>, value: u32) -> Option<NodeId> {
        let mut cur = root;
        while let Some(c) = cur {
            if *tree.data(c) == value {
                return Some(c);
            }
            cur = if value < *tree.data(c) {
                tree.left(c)
            } else {
                tree.right(c)
            };
        }
        None
    }

    fn remove_value(tree: &mut AvlTree<u32>, root: &mut Option<NodeId>, value: u32) -> bool {
        match find(tree, *root, value) {
            Some(id) => {
                *root = tree.remove(id);
                tree.dealloc(id);
                true
            }
            None => false,
        }
    }

    // recomputes height/cnt bottom-up and checks balance, ordering is
    // covered separately by the in-order walk
    fn validate(tree: &AvlTree<u32>, id: Option<NodeId>, parent: Option<NodeId>) -> (u32, u32) {
        let node = match id {
            Some(n) => n,
            None => return (0, 0),
        };
        assert_eq!(tree.parent(node), parent);
        let (lh, lc) = validate(tree, tree.left(node), Some(node));
        let (rh, rc) = validate(tree, tree.right(node), Some(node));
        assert_eq!(tree.height(Some(node)), 1 + lh.max(rh), "height mismatch");
        assert_eq!(tree.count(Some(node)), 1 + lc + rc, "cnt mismatch");
        assert!(lh.abs_diff(rh) <= 1, "unbalanced node");
        (1 + lh.max(rh), 1 + lc + rc)
    }

    fn in_order(tree: &AvlTree<u32>, id: Option<NodeId>, out: &mut Vec<NodeId>) {
        if let Some(n) = id {
            in_order(tree, tree.left(n), out);
            out.push(n);
            in_order(tree, tree.right(n), out);
        }
    }

    fn values_in_order(tree: &AvlTree<u32>, root: Option<NodeId>) -> Vec<u32> {
        let mut ids = Vec::new();
        in_order(tree, root, &mut ids);
        ids.iter().map(|&id| *tree.data(id)).collect()
    }

    #[test]
    fn test_ascending_insert_stays_balanced() {
        let mut tree = AvlTree::new();
        let mut root = None;
        for value in 0..200 {
            insert(&mut tree, &mut root, value);
            validate(&tree, root, None);
        }
        assert_eq!(values_in_order(&tree, root), (0..200).collect::<Vec<_>>());
        // 200 nodes cannot exceed height 10 in a valid AVL tree
        assert!(tree.height(root) <= 10);
    }

    #[test]
    fn test_random_insert_and_delete() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut values: Vec<u32> = (0..300).collect();
        values.shuffle(&mut rng);

        let mut tree = AvlTree::new();
        let mut root = None;
        for &value in &values {
            insert(&mut tree, &mut root, value);
        }
        validate(&tree, root, None);
        assert_eq!(values_in_order(&tree, root), (0..300).collect::<Vec<_>>());

        values.shuffle(&mut rng);
        for (i, &value) in values.iter().take(150).enumerate() {
            assert!(remove_value(&mut tree, &mut root, value));
            if i % 10 == 0 {
                validate(&tree, root, None);
            }
        }
        validate(&tree, root, None);
        assert_eq!(tree.len(), 150);

        let mut remaining = values[150..].to_vec();
        remaining.sort_unstable();
        assert_eq!(values_in_order(&tree, root), remaining);
    }

    #[test]
    fn test_delete_until_empty() {
        let mut tree = AvlTree::new();
        let mut root = None;
        for value in 0..50 {
            insert(&mut tree, &mut root, value);
        }
        for value in 0..50 {
            assert!(remove_value(&mut tree, &mut root, value));
        }
        assert!(root.is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_two_child_deletion_relinks_successor() {
        let mut tree = AvlTree::new();
        let mut root = None;
        for value in [50u32, 25, 75, 10, 30, 60, 90, 55, 65] {
            insert(&mut tree, &mut root, value);
        }
        assert!(remove_value(&mut tree, &mut root, 75));
        validate(&tree, root, None);
        assert_eq!(
            values_in_order(&tree, root),
            vec![10, 25, 30, 50, 55, 60, 65, 90]
        );
        // and the root itself
        assert!(remove_value(&mut tree, &mut root, 50));
        validate(&tree, root, None);
        assert_eq!(
            values_in_order(&tree, root),
            vec![10, 25, 30, 55, 60, 65, 90]
        );
    }

    #[test]
    fn test_offset_reaches_every_rank() {
        let mut tree = AvlTree::new();
        let mut root = None;
        for value in 0..40 {
            insert(&mut tree, &mut root, value);
        }
        let mut ids = Vec::new();
        in_order(&tree, root, &mut ids);

        for i in 0..ids.len() {
            for j in 0..ids.len() {
                let delta = j as i64 - i as i64;
                assert_eq!(
                    tree.offset(ids[i], delta),
                    Some(ids[j]),
                    "offset {} from rank {}",
                    delta,
                    i
                );
            }
        }
        // both out-of-range directions
        assert_eq!(tree.offset(ids[0], -1), None);
        assert_eq!(tree.offset(ids[ids.len() - 1], 1), None);
        assert_eq!(tree.offset(ids[5], 100), None);
    }

    #[test]
    fn test_slot_reuse_after_dealloc() {
        let mut tree = AvlTree::new();
        let mut root = None;
        insert(&mut tree, &mut root, 1);
        insert(&mut tree, &mut root, 2);
        remove_value(&mut tree, &mut root, 1);
        insert(&mut tree, &mut root, 3);
        assert_eq!(tree.len(), 2);
        assert_eq!(values_in_order(&tree, root), vec![2, 3]);
        validate(&tree, root, None);
    }
}
