// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Command routing.
//!
//! Command names are matched as raw bytes and arity is exact; anything else
//! is answered with `ERR(UNKNOWN)`. Every request produces exactly one reply
//! value.

use crate::rushdb::commands::{string_commands, zset_commands};
use crate::rushdb::protocol::response::{ErrCode, Reply};
use crate::rushdb::store::keyspace::Keyspace;

/// Executes one request against the keyspace.
pub fn dispatch(keyspace: &mut Keyspace, args: &[Vec<u8>]) -> Reply {
    if args.is_empty() {
        return Reply::err(ErrCode::Unknown, "unknown command");
    }
    match (args[0].as_slice(), args.len()) {
        (b"get", 2) => string_commands::get(keyspace, &args[1]),
        (b"set", 3) => string_commands::set(keyspace, &args[1], &args[2]),
        (b"del", 2) => string_commands::del(keyspace, &args[1]),
        (b"keys", 1) => string_commands::keys(keyspace),
        (b"zadd", 4) => zset_commands::zadd(keyspace, &args[1], &args[2], &args[3]),
        (b"zrem", 3) => zset_commands::zrem(keyspace, &args[1], &args[2]),
        (b"zscore", 3) => zset_commands::zscore(keyspace, &args[1], &args[2]),
        (b"zquery", 6) => {
            zset_commands::zquery(keyspace, &args[1], &args[2], &args[3], &args[4], &args[5])
        }
        _ => Reply::err(ErrCode::Unknown, "unknown command"),
    }
}
