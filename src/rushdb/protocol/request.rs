// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Request frame parsing.
//!
//! Body layout: `u32 nargs`, then `nargs` repetitions of `u32 len` followed
//! by `len` raw bytes. A connection's incoming buffer may hold any number of
//! complete and partial frames (pipelining); the parser only ever consumes
//! one complete frame from the buffer head.

use crate::rushdb::protocol::MAX_MSG;

/// Upper bound on arguments per request. A frame body is capped at
/// `MAX_MSG`, so any honest request stays far below this.
pub const MAX_ARGS: usize = 1024;

/// Outcome of one parse attempt against the buffer head.
#[derive(Debug, PartialEq, Eq)]
pub enum Request {
    /// Not enough buffered bytes yet; wait for more input.
    Incomplete,
    /// Protocol violation; the connection must be closed without a response.
    Malformed,
    /// One complete request. `frame_len` bytes are to be consumed.
    Complete {
        args: Vec<Vec<u8>>,
        frame_len: usize,
    },
}

/// Attempts to parse one request frame from the start of `buf`.
///
/// ## Output
/// - `Request::Incomplete` when the header or body is still partial
/// - `Request::Malformed` on an oversized length or an inconsistent body
/// - `Request::Complete` with the argument vector otherwise
pub fn try_parse(buf: &[u8]) -> Request {
    if buf.len() < 4 {
        return Request::Incomplete;
    }
    let len = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    if len > MAX_MSG {
        return Request::Malformed;
    }
    if buf.len() < 4 + len {
        return Request::Incomplete;
    }
    match parse_args(&buf[4..4 + len]) {
        Some(args) => Request::Complete {
            args,
            frame_len: 4 + len,
        },
        None => Request::Malformed,
    }
}

fn parse_args(body: &[u8]) -> Option<Vec<Vec<u8>>> {
    let mut rest = body;
    let nargs = read_u32(&mut rest)? as usize;
    if nargs > MAX_ARGS {
        return None;
    }
    let mut args = Vec::with_capacity(nargs);
    for _ in 0..nargs {
        let len = read_u32(&mut rest)? as usize;
        if rest.len() < len {
            return None;
        }
        args.push(rest[..len].to_vec());
        rest = &rest[len..];
    }
    if !rest.is_empty() {
        // trailing bytes the argument list does not account for
        return None;
    }
    Some(args)
}

fn read_u32(rest: &mut &[u8]) -> Option<u32> {
    if rest.len() < 4 {
        return None;
    }
    let value = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
    *rest = &rest[4..];
    Some(value)
}
