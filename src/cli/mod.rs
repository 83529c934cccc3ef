//! CLI interface for paper-ledger
//!
//! Provides subcommands for:
//! - `run`: Scripted paper trading session
//! - `replay`: Submit order intents from a JSONL file
//! - `history`: Show recent trade log records
//! - `config`: Show configuration

mod history;
mod replay;
mod run;

pub use history::HistoryArgs;
pub use replay::ReplayArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "paper-ledger")]
#[command(about = "Simulated order execution and position accounting")]
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
    /// Run a scripted paper trading session
    Run(RunArgs),
    /// Replay order intents from a JSONL file
    Replay(ReplayArgs),
    /// Show recent trade log records
    History(HistoryArgs),
    /// Show configuration
    Config,
}
