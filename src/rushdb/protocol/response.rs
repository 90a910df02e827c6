// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Tagged response values: serialisation and parsing.
//!
//! A response frame is `u32 total_len` followed by exactly one tagged value.
//! Tags: 0 NIL, 1 ERR (code + message), 2 STR, 3 INT (i64), 4 DBL (f64),
//! 5 ARR (count + concatenated values). The parser is the exact inverse of
//! the serialiser and is used by test clients.

use crate::rushdb::protocol::MAX_MSG;
use crate::rushdb::rushstream::{parse_error, RushResult};

pub const TAG_NIL: u8 = 0;
pub const TAG_ERR: u8 = 1;
pub const TAG_STR: u8 = 2;
pub const TAG_INT: u8 = 3;
pub const TAG_DBL: u8 = 4;
pub const TAG_ARR: u8 = 5;

/// Wire error codes carried by `Reply::Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrCode {
    /// Unrecognised command or wrong arity.
    Unknown = 1,
    /// Response exceeded `MAX_MSG`.
    TooBig = 2,
    /// Operation mismatched the entry's type.
    BadType = 3,
    /// Numeric argument failed to parse or was NaN.
    BadArg = 4,
}

/// One tagged response value.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Nil,
    Err { code: u32, message: String },
    Str(Vec<u8>),
    Int(i64),
    Dbl(f64),
    Arr(Vec<Reply>),
}

impl Reply {
    pub fn err(code: ErrCode, message: &str) -> Reply {
        Reply::Err {
            code: code as u32,
            message: message.to_string(),
        }
    }
}

/// Serialises one tagged value, appending to `out`.
pub fn write_value(out: &mut Vec<u8>, value: &Reply) {
    match value {
        Reply::Nil => out.push(TAG_NIL),
        Reply::Err { code, message } => {
            out.push(TAG_ERR);
            out.extend_from_slice(&code.to_le_bytes());
            out.extend_from_slice(&(message.len() as u32).to_le_bytes());
            out.extend_from_slice(message.as_bytes());
        }
        Reply::Str(bytes) => {
            out.push(TAG_STR);
            out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
            out.extend_from_slice(bytes);
        }
        Reply::Int(v) => {
            out.push(TAG_INT);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Reply::Dbl(v) => {
            out.push(TAG_DBL);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Reply::Arr(items) => {
            out.push(TAG_ARR);
            out.extend_from_slice(&(items.len() as u32).to_le_bytes());
            for item in items {
                write_value(out, item);
            }
        }
    }
}

/// Appends one length-framed response to `out`.
///
/// ## Behaviour
/// - Reserves the length header, serialises the value, backfills the length
/// - A body longer than `MAX_MSG` is rewritten in place as `ERR(TOO_BIG)`
pub fn write_response(out: &mut Vec<u8>, value: &Reply) {
    let start = out.len();
    out.extend_from_slice(&[0u8; 4]);
    write_value(out, value);

    let mut body_len = out.len() - start - 4;
    if body_len > MAX_MSG {
        out.truncate(start + 4);
        write_value(out, &Reply::err(ErrCode::TooBig, "response is too big"));
        body_len = out.len() - start - 4;
    }
    out[start..start + 4].copy_from_slice(&(body_len as u32).to_le_bytes());
}

/// Parses one tagged value from the start of `buf`.
///
/// ## Output
/// - `(Reply, usize)`: The value and the number of bytes consumed
///
/// ## Error Conditions
/// - Truncated payloads, unknown tags, non-UTF-8 error messages
pub fn read_value(buf: &[u8]) -> RushResult<(Reply, usize)> {
    if buf.is_empty() {
        return Err(parse_error("reply", "empty buffer"));
    }
    let rest = &buf[1..];
    match buf[0] {
        TAG_NIL => Ok((Reply::Nil, 1)),
        TAG_ERR => {
            let code = take_u32(rest, 0)?;
            let msg_len = take_u32(rest, 4)? as usize;
            if rest.len() < 8 + msg_len {
                return Err(parse_error("reply", "truncated error message"));
            }
            let message = String::from_utf8(rest[8..8 + msg_len].to_vec())
                .map_err(|_| parse_error("reply", "error message is not UTF-8"))?;
            Ok((Reply::Err { code, message }, 1 + 8 + msg_len))
        }
        TAG_STR => {
            let len = take_u32(rest, 0)? as usize;
            if rest.len() < 4 + len {
                return Err(parse_error("reply", "truncated string"));
            }
            Ok((Reply::Str(rest[4..4 + len].to_vec()), 1 + 4 + len))
        }
        TAG_INT => {
            let bytes = take_8(rest)?;
            Ok((Reply::Int(i64::from_le_bytes(bytes)), 9))
        }
        TAG_DBL => {
            let bytes = take_8(rest)?;
            Ok((Reply::Dbl(f64::from_le_bytes(bytes)), 9))
        }
        TAG_ARR => {
            let n = take_u32(rest, 0)? as usize;
            let mut items = Vec::new();
            let mut consumed = 5;
            for _ in 0..n {
                if consumed > buf.len() {
                    return Err(parse_error("reply", "truncated array"));
                }
                let (item, used) = read_value(&buf[consumed..])?;
                items.push(item);
                consumed += used;
            }
            Ok((Reply::Arr(items), consumed))
        }
        tag => Err(parse_error("reply", format!("unknown tag {}", tag))),
    }
}

fn take_u32(buf: &[u8], at: usize) -> RushResult<u32> {
    if buf.len() < at + 4 {
        return Err(parse_error("reply", "truncated integer"));
    }
    Ok(u32::from_le_bytes([
        buf[at],
        buf[at + 1],
        buf[at + 2],
        buf[at + 3],
    ]))
}

fn take_8(buf: &[u8]) -> RushResult<[u8; 8]> {
    if buf.len() < 8 {
        return Err(parse_error("reply", "truncated 8-byte value"));
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[..8]);
    Ok(bytes)
}
