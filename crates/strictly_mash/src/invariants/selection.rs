//! Selection invariants: survivors are never crossed, and there is one of each.

use super::super::GameState;
use super::Invariant;

/// Invariant: a selected option or letter is not crossed out.
pub struct SelectionNotCrossed;

impl Invariant<GameState> for SelectionNotCrossed {
    fn holds(state: &GameState) -> bool {
        let options_ok = state.categories().values().all(|category| {
            category
                .selected_index()
                .is_none_or(|i| i < category.options().len() && !category.is_crossed(i))
        });
        let letters_ok = state
            .mash_letters()
            .iter()
            .all(|cell| !(cell.selected() && cell.crossed()));
        options_ok && letters_ok
    }

    fn description() -> &'static str {
        "Selected items are not crossed out"
    }
}

/// Invariant: at most one letter is selected.
///
/// Categories hold an `Option<usize>`, so they can never select twice.
pub struct SingleSelection;

impl Invariant<GameState> for SingleSelection {
    fn holds(state: &GameState) -> bool {
        state.mash_letters().iter().filter(|c| c.selected()).count() <= 1
    }

    fn description() -> &'static str {
        "At most one letter is selected"
    }
}
