mod cli;
mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playlistreader_core::{load_config, load_config_or_default, validate_config, Config};

use cli::{Cli, Command};

/// Default configuration file looked up in the working directory
const DEFAULT_CONFIG_FILE: &str = "playlistreader.toml";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(commands::EXIT_FAILURE);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };

    // Logs go to stderr so `dump -o -` output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let config = resolve_config(&cli)?;
    info!("Catalog database: {:?}", config.database.path);

    match cli.command {
        Command::Import { file, name, json } => {
            commands::import(&config, &file, name.as_deref(), json)
        }
        Command::Dump { output } => commands::dump(&config, output.as_deref()),
        Command::Add { paths, not_music } => commands::add(&config, &paths, !not_music),
    }
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        // An explicit file must exist
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => {
            let path = std::env::var("PLAYLISTREADER_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
            load_config_or_default(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
    };

    if let Some(database) = &cli.database {
        config.database.path = database.clone();
    }

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}
