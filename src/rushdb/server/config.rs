// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Server configuration: defaults and rush.toml loading.
//!
//! ## File Format
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 1234
//! idle_timeout_ms = 5000
//! max_outgoing = 16777216
//! ```
//! Every key is optional; missing keys fall back to the defaults below.

use crate::rushdb::rushstream::{config_error, io_error, RushResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 1234;
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MAX_OUTGOING: usize = 16 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// IPv4 address the listener binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// TCP port; 0 lets the kernel choose.
    #[serde(default = "default_port")]
    pub port: u16,
    /// A connection idle for longer than this is evicted.
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
    /// Outgoing-buffer cap per connection; overflow closes the connection.
    #[serde(default = "default_max_outgoing")]
    pub max_outgoing: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            max_outgoing: DEFAULT_MAX_OUTGOING,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: Option<ServerConfig>,
}

/// Loads a configuration file.
///
/// ## Output
/// - `ServerConfig`: Parsed values merged with defaults
///
/// ## Error Conditions
/// - Unreadable file
/// - Invalid TOML or mistyped keys
pub fn load_config(path: &Path) -> RushResult<ServerConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        io_error("read", path.to_string_lossy().to_string(), e.to_string())
    })?;
    let parsed: ConfigFile = toml::from_str(&text)
        .map_err(|e| config_error(path.to_string_lossy().to_string(), e.to_string()))?;
    Ok(parsed.server.unwrap_or_default())
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_idle_timeout_ms() -> u64 {
    DEFAULT_IDLE_TIMEOUT_MS
}

fn default_max_outgoing() -> usize {
    DEFAULT_MAX_OUTGOING
}
