//! CLI interface for price-monitor
//!
//! Provides subcommands for:
//! - `run`: Replay a feed script through the monitor
//! - `config`: Show the effective configuration

mod run;

pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "price-monitor")]
#[command(about = "Cross-checks bank and company price feeds and alerts on divergence")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a feed script through the monitor
    Run(RunArgs),
    /// Show configuration
    Config,
}
