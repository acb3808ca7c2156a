//! MASH - the fortune-telling elimination game
//!
//! Terminal front end and headless runner over the [`strictly_mash`] game
//! logic.
//!
//! # Architecture
//!
//! - **Config**: TOML game configuration ([`GameConfig`])
//! - **Runner**: headless elimination with a crossing log
//! - **TUI**: ratatui front end driving the typestate phases
//!
//! # Example
//!
//! ```no_run
//! use mash::{GameConfig, run_headless};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = GameConfig::from_file("mash.toml")?.with_magic_number(Some(4));
//! let outcome = run_headless(config.to_setup(true)?)?;
//! println!("{}", outcome.results.fortune());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod runner;
pub mod tui;

// Crate-level exports - Configuration
pub use config::{CategoryConfig, ConfigError, GameConfig};

// Crate-level exports - Headless runs
pub use runner::{Crossing, Outcome, run_headless};

// Crate-level exports - Game types
pub use strictly_mash::{
    AnyGame, Category, Fortune, GamePlaying, GameResults, GameSetup, GameState, Group, Home, Item,
    ItemKind, MashLetter, Phase, Pick, PlayError, PlayTransition, SetupAction, SetupError,
    StateError, StepEvent, state_schema,
};
