//! First-class invariants for MASH.
//!
//! Invariants are logical properties that must hold throughout a
//! play-through. They are testable independently and are checked as
//! contract postconditions.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Joins violations into one message.
    pub fn join(violations: &[InvariantViolation]) -> String {
        violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn finish(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        finish(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        collect::<S, I3>(state, &mut violations);
        finish(violations)
    }
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        collect::<S, I3>(state, &mut violations);
        collect::<S, I4>(state, &mut violations);
        finish(violations)
    }
}

pub mod crossed_in_range;
pub mod items_mirror_sources;
pub mod selection;

pub use crossed_in_range::CrossedInRange;
pub use items_mirror_sources::ItemsMirrorSources;
pub use selection::{SelectionNotCrossed, SingleSelection};

/// All MASH invariants as a composable set.
pub type MashInvariants = (
    CrossedInRange,
    SelectionNotCrossed,
    SingleSelection,
    ItemsMirrorSources,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameSetup, GameState, PlayTransition, SetupAction};

    fn started() -> crate::GamePlaying {
        let mut setup = GameSetup::new("MASH");
        setup
            .apply(SetupAction::AddCategory {
                key: "city".into(),
                display_name: "City".into(),
            })
            .unwrap();
        for text in ["Paris", "Lima", "Oslo"] {
            setup
                .apply(SetupAction::AddOption {
                    key: "city".into(),
                    text: text.into(),
                })
                .unwrap();
        }
        setup.apply(SetupAction::FinishCategory("city".into())).unwrap();
        setup.apply(SetupAction::SetMagicNumber(2)).unwrap();
        setup.start().unwrap()
    }

    #[test]
    fn test_invariant_set_holds_for_fresh_state() {
        let state = GameState::default();
        assert!(MashInvariants::check_all(&state).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_while_playing() {
        let mut game = started();
        for _ in 0..5 {
            match game.step().unwrap() {
                PlayTransition::Playing { game: next, .. } => game = next,
                PlayTransition::Finished { .. } => return,
            }
            assert!(MashInvariants::check_all(game.state()).is_ok());
        }
    }

    #[test]
    fn test_invariant_set_detects_violations() {
        let mut state = started().state().clone();
        state.category_mut("city").unwrap().crossed_options.insert(7);
        state.mash_letters[0].selected = true;
        state.mash_letters[1].selected = true;

        let violations = MashInvariants::check_all(&state).unwrap_err();
        assert!(violations.len() >= 2);
        assert!(InvariantViolation::join(&violations).contains(';'));
    }

    #[test]
    fn test_two_invariants_as_set() {
        type TwoInvariants = (CrossedInRange, SingleSelection);
        assert!(TwoInvariants::check_all(started().state()).is_ok());
    }
}
