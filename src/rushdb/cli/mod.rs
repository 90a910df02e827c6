// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Command-line interface for the rush server binary.

use crate::rushdb::rushstream::RushResult;
use crate::rushdb::server::config::{load_config, ServerConfig};
use clap::Parser;
use std::path::PathBuf;

/// Command-line flags. Flags override configuration file values.
#[derive(Debug, Parser)]
#[command(name = "rush", version, about = "In-memory key/value server with sorted sets")]
pub struct Cli {
    /// Path to a rush.toml configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// TCP port to listen on.
    #[arg(long)]
    pub port: Option<u16>,

    /// IPv4 address to bind.
    #[arg(long)]
    pub bind: Option<String>,
}

/// Resolves the effective server configuration.
///
/// ## Behaviour
/// - Starts from defaults, or from `--config` when given
/// - `--port` and `--bind` override either
pub fn resolve_config(cli: &Cli) -> RushResult<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(bind) = &cli.bind {
        config.bind = bind.clone();
    }
    Ok(config)
}
