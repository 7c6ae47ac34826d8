use crate::{
    commands::Commands,
    env::EnvManager,
    error::CliError,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod env;
mod error;
mod handlers;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "flatbridge",
    version = "0.1.0",
    about = "Move data between ClickHouse tables and CSV files"
)]
struct Cli {
    #[arg(long, global = true, help = "Load extra environment variables from this file")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the JSON outcome only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "flatbridge failed");
            ExitCode::GeneralError
        }
    };
    std::process::exit(code.as_i32());
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = &cli.env_file {
        env.load_from_file(path)?;
    }

    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();

    let outcome = handlers::execute(cli.command, &env, &shutdown.cancel_token()).await;
    output::print_outcome(&outcome)?;

    Ok(output::exit_code(&outcome, shutdown.is_shutdown_requested()))
}
