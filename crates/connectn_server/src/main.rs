//! Connect-N - unified CLI
//!
//! Authoritative session server plus single-device play.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use connectn_engine::{GameConfig, GameMode};
use connectn_server::{ClientMessage, ServerConfig, ServerMessage};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::Local {
            rows,
            cols,
            connect_n,
            mode,
        } => run_local(rows, cols, connect_n, mode),
        Command::Schema => print_schema(),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,connectn_server=debug")),
        )
        .init();
}

/// Run the WebSocket server
#[instrument(skip_all)]
async fn run_server(
    config_path: Option<std::path::PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    init_tracing();

    let mut config = ServerConfig::load(config_path.as_deref())?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    config.validate()?;

    info!(
        address = %config.bind_address(),
        max_dimension = config.max_dimension(),
        "Starting connect-N server"
    );
    connectn_server::serve(&config).await?;
    Ok(())
}

/// Run a hot-seat game on stdin/stdout
fn run_local(rows: usize, cols: usize, connect_n: usize, mode: GameMode) -> Result<()> {
    // Logs go to stderr so they never interleave with the board.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = GameConfig::new(rows, cols, connect_n, mode)?;
    let stdin = std::io::stdin();
    connectn_server::play_local(config, stdin.lock(), std::io::stdout())?;
    Ok(())
}

/// Print the protocol schema as JSON
fn print_schema() -> Result<()> {
    let schema = serde_json::json!({
        "client": schemars::schema_for!(ClientMessage),
        "server": schemars::schema_for!(ServerMessage),
    });
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
