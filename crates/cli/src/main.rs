//! `crewconnect` - crew schedule and pairing options from the command line

mod cli;
mod commands;
mod context;
mod prompt;

use clap::Parser;
use tracing::{debug, error};

use crate::cli::{Cli, Command};
use crate::context::AppContext;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    // Load .env before the subscriber reads RUST_LOG
    let dotenv = dotenvy::dotenv();
    crewconnect_infra::init_tracing();
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) => debug!(error = %e, "no .env file loaded"),
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.config {
        Some(path) => crewconnect_infra::config::load_from_file(Some(path))?,
        None => crewconnect_infra::config::load()?,
    };

    let ctx = AppContext::connect(config).await?;

    let output = match cli.command {
        Command::Schedule(args) => commands::schedule::run(&ctx, &args).await?,
        Command::Pairings(args) => commands::pairings::run(&ctx, args).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
