//! Command-line interface for gridmatch.

use clap::{Parser, Subcommand};

/// Gridmatch - two-player tic-tac-toe over a watchable document store
#[derive(Parser, Debug)]
#[command(name = "gridmatch")]
#[command(about = "Two-player tic-tac-toe sessions over a shared document store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a scripted exhibition game between two in-process clients
    Demo {
        /// Play the drawn game instead of the won one
        #[arg(long)]
        draw: bool,
    },

    /// Run the read-only game lookup API
    Serve {
        /// Host to bind to (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },
}
