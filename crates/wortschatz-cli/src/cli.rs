//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "WORTSCHATZ_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server.
    Serve {
        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Seed per-level vocabulary tables from a dataset directory.
    Seed {
        /// Directory containing `records_*.json` dataset files.
        #[arg(short, long)]
        dataset: String,

        /// Vector database path (overrides config).
        #[arg(long)]
        db: Option<String>,
    },

    /// Print version information.
    Version,

    /// Check system health.
    Health,
}

// ============================================================================
// Tests
// ============================================================================
