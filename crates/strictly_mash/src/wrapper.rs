//! Serializable game wrapper for typestate phases.

use super::invariants::{InvariantSet, InvariantViolation, MashInvariants};
use super::rules::{self, Group};
use super::typestate::{GamePlaying, GameResults, GameSetup, PlayTransition};
use super::{GameState, Phase};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Error loading or validating a stored game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StateError {
    /// The stored text is not a game state.
    #[display("Failed to parse game state: {}", _0)]
    Parse(String),

    /// The state breaks an invariant.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),

    /// The state's contents do not fit its phase.
    #[display("Inconsistent {} state: {}", phase, reason)]
    PhaseMismatch {
        /// The declared phase.
        phase: Phase,
        /// What is wrong.
        reason: String,
    },
}

impl std::error::Error for StateError {}

/// Serializable wrapper for any phase.
///
/// Typestate phases can't be deserialized on their own, so storage and UI
/// state go through this enum. It serializes as its [`GameState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "GameState", try_from = "GameState")]
pub enum AnyGame {
    /// Game in setup.
    Setup(GameSetup),
    /// Elimination running.
    Playing(GamePlaying),
    /// Every group resolved.
    Results(GameResults),
}

impl From<GameSetup> for AnyGame {
    fn from(game: GameSetup) -> Self {
        AnyGame::Setup(game)
    }
}

impl From<GamePlaying> for AnyGame {
    fn from(game: GamePlaying) -> Self {
        AnyGame::Playing(game)
    }
}

impl From<GameResults> for AnyGame {
    fn from(game: GameResults) -> Self {
        AnyGame::Results(game)
    }
}

impl From<PlayTransition> for AnyGame {
    fn from(transition: PlayTransition) -> Self {
        match transition {
            PlayTransition::Playing { game, .. } => game.into(),
            PlayTransition::Finished { results, .. } => results.into(),
        }
    }
}

impl From<AnyGame> for GameState {
    fn from(game: AnyGame) -> Self {
        game.into_state()
    }
}

fn mismatch(phase: Phase, reason: &str) -> StateError {
    warn!(%phase, reason, "Rejected stored state");
    StateError::PhaseMismatch {
        phase,
        reason: reason.to_string(),
    }
}

/// The index a group has selected, if any.
fn selection(state: &GameState, group: &Group) -> Option<usize> {
    match group {
        Group::Letters => state.mash_letters().iter().position(|c| c.selected()),
        Group::Category(key) => state.category(key).and_then(|c| c.selected_index()),
    }
}

/// Selections are written once, when a group is down to its survivor.
fn check_selections(state: &GameState) -> Result<(), StateError> {
    let phase = state.phase();
    for group in Group::all(state) {
        let chosen = selection(state, &group);
        if phase == Phase::Setup {
            if chosen.is_some() {
                return Err(mismatch(phase, &format!("{} selected before play", group)));
            }
            continue;
        }
        if rules::remaining(state, &group) == 0 {
            return Err(mismatch(phase, &format!("{} has no survivor", group)));
        }
        if chosen != rules::survivor(state, &group) {
            return Err(mismatch(phase, &format!("{} selection does not match its survivor", group)));
        }
    }
    Ok(())
}

impl TryFrom<GameState> for AnyGame {
    type Error = StateError;

    #[instrument(skip(state), fields(phase = %state.phase()))]
    fn try_from(mut state: GameState) -> Result<Self, Self::Error> {
        // States saved without a display order fall back to key order.
        if state.category_order.is_empty() {
            state.category_order = state.categories.keys().cloned().collect();
        }

        MashInvariants::check_all(&state)
            .map_err(|v| StateError::InvariantViolation(InvariantViolation::join(&v)))?;

        let phase = state.phase();
        let known_order = state.category_order().len() == state.categories().len()
            && state
                .category_order()
                .iter()
                .all(|key| state.categories().contains_key(key));
        if !known_order {
            return Err(mismatch(phase, "category order does not match categories"));
        }
        check_selections(&state)?;

        match phase {
            Phase::Setup => {
                if !state.all_items().is_empty() {
                    return Err(mismatch(phase, "elimination sequence before play"));
                }
                Ok(AnyGame::Setup(GameSetup::from_state(state)))
            }
            Phase::Playing => {
                if state.magic_number() == 0 {
                    return Err(mismatch(phase, "no magic number"));
                }
                if state.all_items().is_empty() {
                    return Err(mismatch(phase, "empty elimination sequence"));
                }
                Ok(AnyGame::Playing(GamePlaying::from_state(state)))
            }
            Phase::Results => {
                if !rules::is_complete(&state) {
                    return Err(mismatch(phase, "unresolved group"));
                }
                let letter_chosen = state.selected_letter().is_some();
                let options_chosen = state
                    .categories()
                    .values()
                    .all(|c| c.selected_index().is_some());
                if !letter_chosen || !options_chosen {
                    return Err(mismatch(phase, "missing selection"));
                }
                if state.animation_running() {
                    return Err(mismatch(phase, "animation still running"));
                }
                Ok(AnyGame::Results(GameResults::from_state(state)))
            }
        }
    }
}

impl AnyGame {
    /// Returns the state for any phase.
    pub fn state(&self) -> &GameState {
        match self {
            AnyGame::Setup(game) => game.state(),
            AnyGame::Playing(game) => game.state(),
            AnyGame::Results(game) => game.state(),
        }
    }

    /// Returns the phase.
    pub fn phase(&self) -> Phase {
        self.state().phase()
    }

    /// Unwraps the shared state.
    pub fn into_state(self) -> GameState {
        match self {
            AnyGame::Setup(game) => game.into_state(),
            AnyGame::Playing(game) => game.state,
            AnyGame::Results(game) => game.into_state(),
        }
    }

    /// Parses and validates a stored game.
    #[instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        let state: GameState =
            serde_json::from_str(json).map_err(|e| StateError::Parse(e.to_string()))?;
        debug!(phase = %state.phase(), "Parsed stored state");
        Self::try_from(state)
    }

    /// Serializes the game as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, StateError> {
        serde_json::to_string_pretty(self.state()).map_err(|e| StateError::Parse(e.to_string()))
    }
}

impl Default for AnyGame {
    fn default() -> Self {
        AnyGame::Setup(GameSetup::classic())
    }
}
