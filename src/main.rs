//! Fanout CLI entry point.

use clap::Parser;
use tracing::{debug, warn};

use fanout::cli::{handle_error, Cli, Commands};
use fanout::infrastructure::config::ConfigLoader;
use fanout::infrastructure::logging::{LogConfig, Logger};

#[tokio::main]
async fn main() {
    // Variables already set in the environment win over .env
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => handle_error(err.context("Invalid configuration"), cli.json),
    };

    let _logger = match Logger::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "failed to load .env"),
    }

    let result = match cli.command {
        Commands::Run(args) => fanout::cli::commands::run::execute(args, &config, cli.json).await,
        Commands::Models(args) => {
            fanout::cli::commands::models::execute(args, &config, cli.json).await
        }
        Commands::Check(args) => {
            fanout::cli::commands::check::execute(args, &config, cli.json).await
        }
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
