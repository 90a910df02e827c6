// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Typed keyspace entries.

use crate::rushdb::store::hashmap::str_hash;
use crate::rushdb::store::zset::ZSet;

/// Payload of a keyspace entry. The variant is the entry's type tag;
/// commands that expect the other type report a type mismatch.
pub enum Value {
    Str(Vec<u8>),
    ZSet(ZSet),
}

/// One keyspace record: owned key bytes, cached hash code, typed payload.
pub struct Entry {
    pub key: Vec<u8>,
    pub hcode: u64,
    pub value: Value,
}

impl Entry {
    pub fn new(key: &[u8], value: Value) -> Self {
        Entry {
            key: key.to_vec(),
            hcode: str_hash(key),
            value,
        }
    }
}
