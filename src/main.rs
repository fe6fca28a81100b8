use anyhow::Result;
use clap::Parser;
use resumatch::cli::{handle_command, open_log_file, Cli, Command};
use resumatch::core::ConfigManager;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "resumatch=info,rocket::server=off";

fn init_logging(log_path: &Path, console: bool) -> Result<()> {
    // Only a server start clears the log.
    let file = open_log_file(log_path, console)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(Mutex::new(file))
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(console.then(|| fmt::layer()))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigManager::load()?;
    init_logging(&config.environment.log_path, cli.is_server())?;

    handle_command(cli.command.unwrap_or(Command::Serve), config).await
}
