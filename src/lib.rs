// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! RushDB - In-Memory Key/Value Server
//!
//! This is the main library entry point for RushDB.

pub mod rushdb;
