// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Storage Core
//!
//! In-memory data structures behind the keyspace:
//! - hashmap: incrementally rehashed chained hash map
//! - avl: arena-backed balanced tree with subtree counts
//! - heap: array min-heap with position back-references
//! - zset: sorted set composed from avl + hashmap
//! - entry/keyspace: typed key/value storage

pub mod avl;
pub mod entry;
pub mod hashmap;
pub mod heap;
pub mod keyspace;
pub mod zset;

#[cfg(test)]
mod avl_test;
