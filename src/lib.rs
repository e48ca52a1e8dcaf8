//! fixtrack library root.
//! Field agent tracking for FixKart: session guard, duty state, location
//! pings, shop-visit checkpoints and day reconstruction over SQLite.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod media;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Agent { .. } => cli::commands::agent::handle(cli, cfg),
        Commands::Status => cli::commands::status::handle(cli, cfg),
        Commands::Duty { .. } => cli::commands::duty::handle(cli, cfg),
        Commands::Ping { .. } => cli::commands::ping::handle(cli, cfg),
        Commands::Visit { .. } => cli::commands::visit::handle(cli, cfg),
        Commands::Day { .. } => cli::commands::day::handle(cli, cfg),
        Commands::Sweep { .. } => cli::commands::sweep::handle(cli, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Test mode never reads the user's config file.
    let mut cfg = if cli.test {
        Config::default()
    } else {
        Config::load()?
    };

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(media) = &cli.media_dir {
        cfg.media_dir = media.clone();
    }

    dispatch(&cli, &cfg)
}
