//! Command-line interface for connectn.

use clap::{Parser, Subcommand};
use connectn_engine::GameMode;

/// Connect-N - authoritative game server and local hot-seat play
#[derive(Parser, Debug)]
#[command(name = "connectn")]
#[command(about = "Connect-N game server with capture variants", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the WebSocket game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to (overrides config and environment)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config and environment)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Play a two-player game in this terminal
    Local {
        /// Board rows
        #[arg(long, default_value = "6")]
        rows: usize,

        /// Board columns
        #[arg(long, default_value = "7")]
        cols: usize,

        /// Run length needed to win
        #[arg(short = 'n', long = "connect", default_value = "4")]
        connect_n: usize,

        /// Rule variant: classic, capture or extreme-capture
        #[arg(short, long, default_value = "classic")]
        mode: GameMode,
    },

    /// Print the JSON Schema of the wire protocol
    Schema,
}
