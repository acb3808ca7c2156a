//! Crossed indices stay inside their option lists.

use super::super::GameState;
use super::Invariant;

/// Invariant: every crossed index is a valid option index.
pub struct CrossedInRange;

impl Invariant<GameState> for CrossedInRange {
    fn holds(state: &GameState) -> bool {
        state.categories().values().all(|category| {
            category
                .crossed_options()
                .iter()
                .all(|&i| i < category.options().len())
        })
    }

    fn description() -> &'static str {
        "Crossed options are valid option indices"
    }
}
