// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::rushdb::server::idle::DList;

    #[test]
    fn test_empty_list() {
        let list: DList<i32> = DList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.front().is_none());
    }

    #[test]
    fn test_push_back_orders_oldest_first() {
        let mut list = DList::new();
        list.push_back(1);
        list.push_back(2);
        list.push_back(3);

        assert_eq!(list.len(), 3);
        let (_, &front) = list.front().expect("non-empty");
        assert_eq!(front, 1);
    }

    #[test]
    fn test_move_to_back_rotates() {
        let mut list = DList::new();
        let a = list.push_back("a");
        list.push_back("b");
        list.push_back("c");

        list.move_to_back(a);
        let (_, &front) = list.front().expect("non-empty");
        assert_eq!(front, "b");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_detach_middle() {
        let mut list = DList::new();
        list.push_back(1);
        let b = list.push_back(2);
        list.push_back(3);

        assert_eq!(list.detach(b), 2);
        assert_eq!(list.len(), 2);
        let (front_handle, &front) = list.front().expect("non-empty");
        assert_eq!(front, 1);

        assert_eq!(list.detach(front_handle), 1);
        let (last_handle, &last) = list.front().expect("non-empty");
        assert_eq!(last, 3);
        assert_eq!(list.detach(last_handle), 3);
        assert!(list.is_empty());
    }

    #[test]
    fn test_slot_reuse_keeps_order() {
        let mut list = DList::new();
        let a = list.push_back(10);
        list.push_back(20);
        list.detach(a);
        list.push_back(30); // reuses a's slot

        let (handle, &front) = list.front().expect("non-empty");
        assert_eq!(front, 20);
        list.detach(handle);
        let (_, &next) = list.front().expect("non-empty");
        assert_eq!(next, 30);
    }
}
