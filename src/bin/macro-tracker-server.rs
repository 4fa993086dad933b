// ABOUTME: Macro tracker API server binary
// ABOUTME: Loads configuration, initializes logging, and serves the user and health routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Macro Tracker Server Binary

use anyhow::Result;
use clap::Parser;
use macro_tracker_server::{config::ServerConfig, logging, nutrition::TargetCommitMode, server};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "macro-tracker-server")]
#[command(about = "Macro tracker API - daily nutrition targets from profile and goal")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override target commit mode (`unserialized` or `per_user`)
    #[arg(long)]
    commit_mode: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(raw) = args.commit_mode.as_deref() {
        config.commit_mode = TargetCommitMode::parse(raw)
            .ok_or_else(|| anyhow::anyhow!("Invalid commit mode: '{raw}'"))?;
    }
    config.validate()?;

    logging::init(&config)?;

    info!("Starting macro tracker server");
    info!("{}", config.summary());
    for warning in config.startup_warnings() {
        warn!("{warning}");
    }

    if let Err(e) = server::run(config).await {
        error!("Server error: {e:#}");
        return Err(e);
    }
    Ok(())
}
