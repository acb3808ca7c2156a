//! Command-line interface for mash.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MASH - the fortune-telling elimination game
#[derive(Parser, Debug)]
#[command(name = "mash")]
#[command(about = "Count out your future: Mansion, Apartment, Shack or House", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Path to game config
        #[arg(short, long, default_value = "mash.toml")]
        config: PathBuf,

        /// Magic number (overrides the config)
        #[arg(short, long)]
        magic: Option<u32>,
    },

    /// Run the elimination headless over the configured options
    Run {
        /// Path to game config
        #[arg(short, long, default_value = "mash.toml")]
        config: PathBuf,

        /// Magic number (overrides the config)
        #[arg(short, long)]
        magic: Option<u32>,

        /// Print the final state as JSON instead of the fortune
        #[arg(long)]
        json: bool,

        /// Print every crossing
        #[arg(long)]
        trace: bool,

        /// Write the final state JSON here
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Validate a saved game state
    Check {
        /// Saved state JSON
        path: PathBuf,
    },

    /// Print the JSON Schema of the saved game state
    Schema,
}
