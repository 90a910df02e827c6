// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! String and keyspace-wide commands: get, set, del, keys.

use crate::rushdb::protocol::response::{ErrCode, Reply};
use crate::rushdb::store::entry::{Entry, Value};
use crate::rushdb::store::keyspace::Keyspace;

/// `get k`: value of a string entry, NIL when the key is missing.
pub fn get(keyspace: &Keyspace, key: &[u8]) -> Reply {
    match keyspace.get(key) {
        None => Reply::Nil,
        Some(entry) => match &entry.value {
            Value::Str(bytes) => Reply::Str(bytes.clone()),
            Value::ZSet(_) => Reply::err(ErrCode::BadType, "not a string value"),
        },
    }
}

/// `set k v`: upserts a string entry.
pub fn set(keyspace: &mut Keyspace, key: &[u8], value: &[u8]) -> Reply {
    if keyspace.get(key).is_none() {
        keyspace.insert(Entry::new(key, Value::Str(value.to_vec())));
        return Reply::Nil;
    }
    let entry = keyspace.get_mut(key).expect("entry present");
    match &mut entry.value {
        Value::Str(bytes) => {
            *bytes = value.to_vec();
            Reply::Nil
        }
        Value::ZSet(_) => Reply::err(ErrCode::BadType, "a non-string value exists"),
    }
}

/// `del k`: removes an entry of any type.
pub fn del(keyspace: &mut Keyspace, key: &[u8]) -> Reply {
    match keyspace.remove(key) {
        Some(_) => Reply::Int(1),
        None => Reply::Int(0),
    }
}

/// `keys`: all key names.
pub fn keys(keyspace: &Keyspace) -> Reply {
    let mut items = Vec::new();
    keyspace.for_each(|entry| {
        items.push(Reply::Str(entry.key.clone()));
        true
    });
    Reply::Arr(items)
}
