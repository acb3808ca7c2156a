//! Strictly MASH - pure game logic for the MASH fortune game.
//!
//! The player fills themed categories with candidate answers, picks a magic
//! number, and the elimination counts through every letter of the title word
//! and every candidate, crossing out each magic-number-th item until one
//! survivor remains per group.
//!
//! # Architecture
//!
//! - **Types**: the [`GameState`] data model and its parts
//! - **Typestate**: [`GameSetup`] → [`GamePlaying`] → [`GameResults`]
//! - **Rules**: counting and group resolution
//! - **Invariants / Contracts**: properties checked around every transition
//! - **Wrapper**: [`AnyGame`] for storage and UI state
//!
//! # Example
//!
//! ```
//! use strictly_mash::{GameSetup, SetupAction};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut setup = GameSetup::new("MASH");
//! setup.apply(SetupAction::AddCategory {
//!     key: "car".to_string(),
//!     display_name: "Car".to_string(),
//! })?;
//! for option in ["Bicycle", "Van", "Convertible"] {
//!     setup.apply(SetupAction::AddOption {
//!         key: "car".to_string(),
//!         text: option.to_string(),
//!     })?;
//! }
//! setup.apply(SetupAction::FinishCategory("car".to_string()))?;
//! setup.apply(SetupAction::SetMagicNumber(3))?;
//!
//! let results = setup.start()?.run_to_completion()?;
//! assert_eq!(results.fortune().picks().len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod contracts;
mod invariants;
mod presets;
pub mod rules;
mod schema;
mod state;
mod types;
mod typestate;
mod wrapper;

pub use action::{PlayError, SetupAction, SetupError};
pub use contracts::{Contract, SetupContract, StartContract, StepContract};
pub use invariants::{
    CrossedInRange, Invariant, InvariantSet, InvariantViolation, ItemsMirrorSources,
    MashInvariants, SelectionNotCrossed, SingleSelection,
};
pub use rules::Group;
pub use presets::{DEFAULT_LETTERS, default_categories};
pub use schema::state_schema;
pub use state::GameState;
pub use types::{Category, Home, Item, ItemKind, MashLetter, Phase};
pub use typestate::{
    Fortune, GamePlaying, GameResults, GameSetup, Pick, PlayTransition, StepEvent,
};
pub use wrapper::{AnyGame, StateError};
