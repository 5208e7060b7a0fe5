//! # Vetted BFF Main Entry Point
//!
//! This is the main entry point for the Vetted BFF service.

use anyhow::Context;
use clap::{Parser, Subcommand};
use vetted_bff::{
    config::ConfigLoader,
    db::{init_pool, run_migrations},
    server::run_server,
    telemetry::init_tracing,
};

/// Backend-for-frontend of the Vetted pet-management application
#[derive(Parser, Debug)]
#[command(name = "vetted-bff", version, long_about = None)]
struct Cli {
    /// Command to run (defaults to `serve`)
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from layered env files and variables
    let config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;

    init_tracing(&config).context("initializing tracing")?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let db = init_pool(&config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Migrate => run_migrations(&db).await,
        Command::Serve => {
            if config.auto_migrate {
                run_migrations(&db).await?;
            }
            run_server(config, db).await
        }
    }
}
