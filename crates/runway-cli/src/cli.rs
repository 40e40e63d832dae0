//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Runway - Savings goal forecasting from account history
#[derive(Parser)]
#[command(name = "runway")]
#[command(about = "Forecast whether a savings goal is achievable", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a transaction CSV against a savings goal
    Analyze {
        /// Transaction CSV file (date, amount, merchant, category, account)
        #[arg(short, long)]
        file: PathBuf,

        /// Free-text goal, e.g. "save $5,000 by June 2026"
        #[arg(short, long, conflicts_with_all = ["target", "months"])]
        goal: Option<String>,

        /// Target amount for a structured goal
        #[arg(long, requires = "months")]
        target: Option<f64>,

        /// Months until the deadline for a structured goal
        #[arg(long, requires = "target")]
        months: Option<u32>,

        /// Savings already put toward the goal
        #[arg(long)]
        savings: Option<f64>,

        /// Monthly amount to keep out of the plan as a safety margin
        #[arg(long)]
        buffer: Option<f64>,

        /// Category to protect from trim suggestions (repeatable)
        #[arg(long = "protect", value_name = "CATEGORY")]
        protected: Vec<String>,
    },

    /// Start the REST API server
    Serve {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
}
