//! The flattened sequence agrees with the letters and categories it was built from.

use super::super::{GameState, ItemKind, Phase};
use super::Invariant;

/// Invariant: outside setup, `all_items` covers every letter and option
/// exactly once, in order, and mirrors their crossed flags.
pub struct ItemsMirrorSources;

impl Invariant<GameState> for ItemsMirrorSources {
    fn holds(state: &GameState) -> bool {
        if state.phase() == Phase::Setup {
            return true;
        }

        let items = state.all_items();
        if items.len() != state.mash_letters().len() + state.option_count() {
            return false;
        }

        let letters = state.mash_letters().iter().enumerate().map(|(index, cell)| {
            (ItemKind::Mash, None::<&str>, index, cell.crossed())
        });
        let options = state.categories_in_order().flat_map(|category| {
            (0..category.options().len()).map(move |index| {
                (
                    ItemKind::Category,
                    Some(category.name()),
                    index,
                    category.is_crossed(index),
                )
            })
        });

        letters.chain(options).zip(items).all(|(expected, item)| {
            expected == (item.kind(), item.category_key(), item.index(), item.crossed())
        })
    }

    fn description() -> &'static str {
        "Elimination sequence mirrors letters and options"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameSetup, SetupAction};

    fn playing() -> GameState {
        let mut setup = GameSetup::new("MASH");
        setup
            .apply(SetupAction::AddCategory {
                key: "job".into(),
                display_name: "Job".into(),
            })
            .unwrap();
        for text in ["Chef", "Pilot"] {
            setup
                .apply(SetupAction::AddOption {
                    key: "job".into(),
                    text: text.into(),
                })
                .unwrap();
        }
        setup.apply(SetupAction::FinishCategory("job".into())).unwrap();
        setup.apply(SetupAction::SetMagicNumber(3)).unwrap();
        setup.start().unwrap().state().clone()
    }

    #[test]
    fn test_setup_is_exempt() {
        let state = GameState::new("MASH");
        assert!(ItemsMirrorSources::holds(&state));
    }

    #[test]
    fn test_started_game_holds() {
        let state = playing();
        assert_eq!(state.all_items().len(), 6);
        assert!(ItemsMirrorSources::holds(&state));
    }

    #[test]
    fn test_cross_through_state_holds() {
        let mut state = playing();
        state.cross(4);
        assert!(ItemsMirrorSources::holds(&state));
    }

    #[test]
    fn test_stale_item_violates() {
        let mut state = playing();
        state.all_items[4].crossed = true;
        assert!(!ItemsMirrorSources::holds(&state));
    }

    #[test]
    fn test_missing_item_violates() {
        let mut state = playing();
        state.all_items.pop();
        assert!(!ItemsMirrorSources::holds(&state));
    }
}
