// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Sorted-set commands: zadd, zrem, zscore, zquery.
//!
//! A missing key behaves like an empty sorted set for the read paths; only
//! `zadd` creates the entry. An entry whose last member was removed stays in
//! the keyspace until `del`.

use crate::rushdb::protocol::response::{ErrCode, Reply};
use crate::rushdb::store::entry::{Entry, Value};
use crate::rushdb::store::keyspace::Keyspace;
use crate::rushdb::store::zset::ZSet;

/// `zadd k score name`: adds a member or updates its score.
pub fn zadd(keyspace: &mut Keyspace, key: &[u8], score_arg: &[u8], name: &[u8]) -> Reply {
    let score = match parse_float(score_arg) {
        Some(score) => score,
        None => return Reply::err(ErrCode::BadArg, "expected fp number"),
    };
    if keyspace.get(key).is_none() {
        keyspace.insert(Entry::new(key, Value::ZSet(ZSet::new())));
    }
    let entry = keyspace.get_mut(key).expect("entry present");
    match &mut entry.value {
        Value::ZSet(zset) => Reply::Int(i64::from(zset.insert(name, score))),
        Value::Str(_) => Reply::err(ErrCode::BadType, "expected zset"),
    }
}

/// `zrem k name`: removes a member.
pub fn zrem(keyspace: &mut Keyspace, key: &[u8], name: &[u8]) -> Reply {
    match keyspace.get_mut(key) {
        None => Reply::Int(0),
        Some(entry) => match &mut entry.value {
            Value::ZSet(zset) => Reply::Int(i64::from(zset.delete(name))),
            Value::Str(_) => Reply::err(ErrCode::BadType, "expected zset"),
        },
    }
}

/// `zscore k name`: the member's score, NIL when absent.
pub fn zscore(keyspace: &Keyspace, key: &[u8], name: &[u8]) -> Reply {
    let zset = match zset_of(keyspace, key) {
        Err(reply) => return reply,
        Ok(None) => return Reply::Nil,
        Ok(Some(zset)) => zset,
    };
    match zset.lookup(name) {
        Some(node) => Reply::Dbl(node.score),
        None => Reply::Nil,
    }
}

/// `zquery k score name offset limit`: ordered range walk.
///
/// ## Behaviour
/// - Seeks the least member at or after `(score, name)`, then steps
///   `offset` positions (negative walks backward)
/// - Emits up to `limit` members as a flat array: name, score, name, score…
/// - A non-positive limit or an out-of-range start yields an empty array
pub fn zquery(
    keyspace: &Keyspace,
    key: &[u8],
    score_arg: &[u8],
    name: &[u8],
    offset_arg: &[u8],
    limit_arg: &[u8],
) -> Reply {
    let score = match parse_float(score_arg) {
        Some(score) => score,
        None => return Reply::err(ErrCode::BadArg, "expected fp number"),
    };
    let offset = match parse_int(offset_arg) {
        Some(offset) => offset,
        None => return Reply::err(ErrCode::BadArg, "expected int"),
    };
    let limit = match parse_int(limit_arg) {
        Some(limit) => limit,
        None => return Reply::err(ErrCode::BadArg, "expected int"),
    };

    let zset = match zset_of(keyspace, key) {
        Err(reply) => return reply,
        Ok(None) => return Reply::Arr(Vec::new()),
        Ok(Some(zset)) => zset,
    };
    if limit <= 0 {
        return Reply::Arr(Vec::new());
    }

    let mut cur = zset
        .seek_ge(score, name)
        .and_then(|id| zset.offset(id, offset));
    let mut items = Vec::new();
    let mut remaining = limit;
    while remaining > 0 {
        let id = match cur {
            Some(id) => id,
            None => break,
        };
        let node = zset.node(id);
        items.push(Reply::Str(node.name.clone()));
        items.push(Reply::Dbl(node.score));
        remaining -= 1;
        cur = zset.offset(id, 1);
    }
    Reply::Arr(items)
}

// missing key reads as "no zset" (Ok(None)); a string entry is a type error
fn zset_of<'a>(keyspace: &'a Keyspace, key: &[u8]) -> Result<Option<&'a ZSet>, Reply> {
    match keyspace.get(key) {
        None => Ok(None),
        Some(entry) => match &entry.value {
            Value::ZSet(zset) => Ok(Some(zset)),
            Value::Str(_) => Err(Reply::err(ErrCode::BadType, "expected zset")),
        },
    }
}

fn parse_float(bytes: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(bytes).ok()?;
    let value: f64 = text.parse().ok()?;
    if value.is_nan() {
        return None;
    }
    Some(value)
}

fn parse_int(bytes: &[u8]) -> Option<i64> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}
