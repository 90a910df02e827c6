// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

mod rushdb;

use clap::Parser;
use rushdb::cli::{resolve_config, Cli};
use rushdb::rushstream::RushResult;
use rushdb::server::event_loop::Server;

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => {
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> RushResult<()> {
    let config = resolve_config(&cli)?;

    println!("🚀 Starting rush server...");
    println!("   Bind: {}:{}", config.bind, config.port);
    println!("   Idle timeout: {} ms", config.idle_timeout_ms);

    let mut server = Server::bind(config)?;
    server.run()
}
