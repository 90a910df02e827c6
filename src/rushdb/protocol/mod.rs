// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Wire protocol: length-framed requests and tagged-value responses.
//!
//! Every frame starts with a little-endian `u32` byte length of the body
//! that follows. All multi-byte integers and floats on the wire are
//! little-endian.

pub mod request;
pub mod response;

#[cfg(test)]
mod request_test;

/// Maximum frame body length, requests and responses alike.
pub const MAX_MSG: usize = 4096;
