//! Game rules for MASH.
//!
//! Pure functions over [`GameState`](crate::GameState). Rules are kept
//! apart from the typestate so contracts and invariants can reuse them.

pub mod counting;
pub mod resolution;

pub use counting::{eligible_count, is_eligible, next_crossing, next_eligible, visits_needed};
pub use resolution::{Group, is_complete, is_resolved, remaining, survivor};
