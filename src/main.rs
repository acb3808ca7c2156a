//! MASH - Unified CLI
//!
//! Play in the terminal, run headless, or inspect saved games.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use mash::{AnyGame, GameConfig, run_headless, state_schema};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { config, magic } => run_play(config, magic).await,
        Command::Run {
            config,
            magic,
            json,
            trace,
            save,
        } => {
            initialize_tracing();
            run_game(&config, magic, json, trace, save.as_deref())
        }
        Command::Check { path } => {
            initialize_tracing();
            check_state(&path)
        }
        Command::Schema => {
            let schema = serde_json::to_string_pretty(&state_schema()?)?;
            println!("{}", schema);
            Ok(())
        }
    }
}

fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

#[instrument(skip_all, fields(config_path = %config_path.display()))]
fn load_config(config_path: &Path, magic: Option<u32>) -> Result<GameConfig> {
    let config = GameConfig::load_or_default(config_path)?.with_magic_number(magic);
    if let Some(n) = magic {
        info!(magic_number = n, "Overriding magic number");
    }
    Ok(config)
}

/// Run the terminal UI
async fn run_play(config_path: PathBuf, magic: Option<u32>) -> Result<()> {
    // The TUI installs its own file logger, so load quietly.
    let config = GameConfig::load_or_default(&config_path)?.with_magic_number(magic);
    mash::tui::run_tui(config).await
}

/// Run the elimination without a terminal UI
#[instrument(skip_all, fields(config_path = %config_path.display()))]
fn run_game(
    config_path: &Path,
    magic: Option<u32>,
    json: bool,
    trace: bool,
    save: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path, magic)?;
    let setup = config
        .to_setup(true)
        .context("Config does not describe a playable game")?;
    let outcome = run_headless(setup)?;

    if trace {
        for crossing in &outcome.crossings {
            println!("{}", crossing);
        }
        println!();
    }

    let game = AnyGame::from(outcome.results);
    if json {
        println!("{}", game.to_json_pretty()?);
    } else if let AnyGame::Results(results) = &game {
        println!("{}", results.fortune());
    }

    if let Some(path) = save {
        std::fs::write(path, game.to_json_pretty()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Saved final state");
    }

    Ok(())
}

/// Load and validate a saved state
#[instrument(skip_all, fields(path = %path.display()))]
fn check_state(path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let game = AnyGame::from_json(&json)?;
    let state = game.state();
    println!(
        "{}: valid {} state, {} letters, {} categories, {} items",
        path.display(),
        state.phase(),
        state.mash_letters().len(),
        state.categories().len(),
        state.all_items().len()
    );
    if let AnyGame::Results(results) = &game {
        println!("{}", results.fortune());
    }
    Ok(())
}
