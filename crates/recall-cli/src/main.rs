//! recall CLI entry point.
//!
//! Binary name: `recall`
//!
//! Parses CLI arguments, resolves credentials, storage and configuration,
//! then runs one interactive chat session.

mod cli;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info,recall=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Credentials, data directory, database and config
    let state = AppState::init(&cli).await?;

    cli::chat::loop_runner::run_chat_loop(state).await?;
    Ok(())
}
