//! # Earshot
//!
//! Runs a headless listener session: creates listeners, moves them around,
//! and tears them down in the order that forces the most slot moves,
//! checking after every step that the engine still sees the right poses.
//!
//! Usage: `earshot [CONFIG]` (defaults to `earshot.toml`).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod scenario;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{EngineConfig, CONFIG_FILE};

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("earshot=info".parse()?))
        .init();

    info!("Earshot starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_FILE.to_string());
    let mut config = EngineConfig::load_from(&path);
    config.validate();

    let report = scenario::run(&config)?;
    info!(
        "Session finished: {} listeners created, {} slot moves, {} left",
        report.created, report.moves, report.remaining
    );

    Ok(())
}
