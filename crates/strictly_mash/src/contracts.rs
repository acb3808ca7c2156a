//! Contract-based validation for MASH.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use super::action::{PlayError, SetupAction, SetupError};
use super::invariants::{InvariantSet, InvariantViolation, MashInvariants};
use super::{Category, GameState};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
///
/// - Precondition: {P(state, action)} - must hold before applying action
/// - Postcondition: {Q(before, after)} - must hold after applying action
pub trait Contract<S, A> {
    /// Error reported when a condition fails.
    type Error;

    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), Self::Error>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), Self::Error>;
}

// ─────────────────────────────────────────────────────────────
//  Setup Preconditions
// ─────────────────────────────────────────────────────────────

fn existing<'a>(state: &'a GameState, key: &str) -> Result<&'a Category, SetupError> {
    state
        .category(key)
        .ok_or_else(|| SetupError::UnknownCategory(key.to_string()))
}

fn unlocked<'a>(state: &'a GameState, key: &str) -> Result<&'a Category, SetupError> {
    let category = existing(state, key)?;
    if category.all_options_added() {
        Err(SetupError::CategoryLocked(key.to_string()))
    } else {
        Ok(category)
    }
}

fn focused(state: &GameState) -> Result<&Category, SetupError> {
    let key = state
        .selected_category()
        .ok_or(SetupError::NoCategorySelected)?;
    unlocked(state, key)
}

fn acceptable_option(category: &Category, text: &str) -> Result<(), SetupError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SetupError::EmptyOption);
    }
    if category.options().iter().any(|o| o == text) {
        return Err(SetupError::DuplicateOption(text.to_string()));
    }
    Ok(())
}

/// Contract for setup edits.
///
/// Preconditions depend on the action; the postcondition is that every
/// invariant still holds.
pub struct SetupContract;

impl Contract<GameState, SetupAction> for SetupContract {
    type Error = SetupError;

    #[instrument(skip(state))]
    fn pre(state: &GameState, action: &SetupAction) -> Result<(), SetupError> {
        match action {
            SetupAction::AddCategory { key, .. } => {
                if key.trim().is_empty() {
                    return Err(SetupError::InvalidCategoryKey(key.clone()));
                }
                if state.category(key).is_some() {
                    return Err(SetupError::DuplicateCategory(key.clone()));
                }
                Ok(())
            }
            SetupAction::SelectCategory(Some(key)) => existing(state, key).map(|_| ()),
            SetupAction::SelectCategory(None) | SetupAction::Backspace => Ok(()),
            SetupAction::TypeChar(_) => focused(state).map(|_| ()),
            SetupAction::CommitInput => {
                let category = focused(state)?;
                acceptable_option(category, state.current_input())
            }
            SetupAction::AddOption { key, text } => acceptable_option(unlocked(state, key)?, text),
            SetupAction::RemoveOption { key, index } => {
                let category = unlocked(state, key)?;
                if *index >= category.options().len() {
                    return Err(SetupError::OptionOutOfRange(*index));
                }
                Ok(())
            }
            SetupAction::FinishCategory(key) => {
                let category = unlocked(state, key)?;
                if category.options().is_empty() {
                    return Err(SetupError::EmptyCategory(key.clone()));
                }
                Ok(())
            }
            SetupAction::SetMagicNumber(n) => {
                if *n == 0 {
                    return Err(SetupError::InvalidMagicNumber(*n));
                }
                Ok(())
            }
        }
    }

    fn post(_before: &GameState, after: &GameState) -> Result<(), SetupError> {
        MashInvariants::check_all(after).map_err(|violations| {
            SetupError::InvariantViolation(format!(
                "Postcondition failed: {}",
                InvariantViolation::join(&violations)
            ))
        })
    }
}

// ─────────────────────────────────────────────────────────────
//  Start Contract
// ─────────────────────────────────────────────────────────────

/// Contract for leaving setup.
///
/// Preconditions:
/// - At least one letter and one category
/// - Every category finished and non-empty
/// - Magic number of at least 1
///
/// Postcondition: every invariant holds on the playing state.
pub struct StartContract;

impl Contract<GameState, ()> for StartContract {
    type Error = SetupError;

    #[instrument(skip(state, _action))]
    fn pre(state: &GameState, _action: &()) -> Result<(), SetupError> {
        if state.mash_letters().is_empty() {
            return Err(SetupError::NoLetters);
        }
        if state.category_order().is_empty() {
            return Err(SetupError::NoCategories);
        }
        for category in state.categories_in_order() {
            if category.options().is_empty() {
                return Err(SetupError::EmptyCategory(category.name().to_string()));
            }
            if !category.all_options_added() {
                return Err(SetupError::CategoryNotFinished(category.name().to_string()));
            }
        }
        if state.magic_number() == 0 {
            return Err(SetupError::InvalidMagicNumber(0));
        }
        Ok(())
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), SetupError> {
        SetupContract::post(before, after)
    }
}

// ─────────────────────────────────────────────────────────────
//  Step Contract
// ─────────────────────────────────────────────────────────────

/// Contract for one elimination step.
///
/// Postconditions:
/// - Every invariant holds
/// - The cursor never moves backwards
/// - Nothing is uncrossed
pub struct StepContract;

impl Contract<GameState, ()> for StepContract {
    type Error = PlayError;

    fn pre(_state: &GameState, _action: &()) -> Result<(), PlayError> {
        Ok(())
    }

    #[instrument(skip_all)]
    fn post(before: &GameState, after: &GameState) -> Result<(), PlayError> {
        if after.current_animation_index() < before.current_animation_index() {
            warn!(
                before = before.current_animation_index(),
                after = after.current_animation_index(),
                "Animation cursor moved backwards"
            );
            return Err(PlayError::InvariantViolation(
                "Animation cursor moved backwards".to_string(),
            ));
        }

        let uncrossed = before
            .all_items()
            .iter()
            .zip(after.all_items())
            .any(|(b, a)| b.crossed() && !a.crossed());
        if uncrossed {
            return Err(PlayError::InvariantViolation(
                "A crossed item was restored".to_string(),
            ));
        }

        MashInvariants::check_all(after).map_err(|violations| {
            PlayError::InvariantViolation(format!(
                "Postcondition failed: {}",
                InvariantViolation::join(&violations)
            ))
        })
    }
}
