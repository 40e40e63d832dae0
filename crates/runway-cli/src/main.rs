//! Runway CLI - savings goal forecaster
//!
//! Usage:
//!   runway analyze --file txns.csv --goal "save $5k by June 2026"
//!   runway analyze --file txns.csv --target 5000 --months 10
//!   runway serve --port 3000

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Analyze {
            file,
            goal,
            target,
            months,
            savings,
            buffer,
            protected,
        } => {
            commands::cmd_analyze(&file, goal, target, months, savings, buffer, protected).await
        }
        Commands::Serve { host, port } => commands::cmd_serve(&host, port).await,
    }
}
