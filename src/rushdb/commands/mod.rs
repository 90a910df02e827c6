// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Command Layer
//!
//! Routes parsed request vectors to their handlers and turns keyspace
//! results into tagged reply values.

pub mod dispatch;
pub mod string_commands;
pub mod zset_commands;
