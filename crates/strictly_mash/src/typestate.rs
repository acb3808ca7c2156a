//! Phase-specific typestate structs for MASH.
//!
//! Each phase is its own type: only [`GameSetup`] accepts edits, only
//! [`GamePlaying`] steps, and only [`GameResults`] carries a [`Fortune`].
//! All three wrap the same [`GameState`], whose `phase` always agrees with
//! the wrapper holding it.

use super::action::{PlayError, SetupAction, SetupError};
use super::contracts::{Contract, SetupContract, StartContract, StepContract};
use super::presets::default_categories;
use super::rules::{self, Group};
use super::{Category, GameState, Home, Item, Phase};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Setup Phase
// ─────────────────────────────────────────────────────────────

/// Game in setup: categories, options and the magic number are edited here.
#[derive(Debug, Clone)]
pub struct GameSetup {
    state: GameState,
}

impl GameSetup {
    /// Creates an empty setup spelling `letters`.
    #[instrument]
    pub fn new(letters: &str) -> Self {
        Self {
            state: GameState::new(letters),
        }
    }

    /// Creates a setup with the given categories in display order.
    ///
    /// Categories arrive empty and unlocked; a repeated key is skipped.
    #[instrument(skip(categories))]
    pub fn with_categories(letters: &str, categories: impl IntoIterator<Item = Category>) -> Self {
        let mut setup = Self::new(letters);
        for mut category in categories {
            if setup.state.categories.contains_key(&category.name) {
                warn!(key = %category.name, "Skipping duplicate category");
                continue;
            }
            category.options.clear();
            category.all_options_added = false;
            category.clear_elimination();
            setup.state.category_order.push(category.name.clone());
            setup.state.categories.insert(category.name.clone(), category);
        }
        setup
    }

    /// Creates a setup with the classic categories.
    pub fn classic() -> Self {
        Self::with_categories(crate::DEFAULT_LETTERS, default_categories())
    }

    pub(crate) fn from_state(state: GameState) -> Self {
        Self { state }
    }

    pub(crate) fn into_state(self) -> GameState {
        self.state
    }

    /// Returns the state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Applies a setup edit.
    ///
    /// Contract enforcement:
    /// - Preconditions checked always
    /// - Postconditions checked in debug builds only
    #[instrument(skip(self), fields(action = %action))]
    pub fn apply(&mut self, action: SetupAction) -> Result<(), SetupError> {
        SetupContract::pre(&self.state, &action)?;

        #[cfg(debug_assertions)]
        let before = self.state.clone();

        let state = &mut self.state;
        match action {
            SetupAction::AddCategory { key, display_name } => {
                state.category_order.push(key.clone());
                state.categories.insert(key.clone(), Category::new(key, display_name));
            }
            SetupAction::SelectCategory(key) => {
                if state.selected_category != key {
                    state.current_input.clear();
                }
                state.selected_category = key;
            }
            SetupAction::TypeChar(c) => state.current_input.push(c),
            SetupAction::Backspace => {
                state.current_input.pop();
            }
            SetupAction::CommitInput => {
                let text = state.current_input.trim().to_string();
                state.current_input.clear();
                let key = state.selected_category.clone().unwrap_or_default();
                if let Some(category) = state.category_mut(&key) {
                    category.options.push(text);
                }
            }
            SetupAction::AddOption { key, text } => {
                if let Some(category) = state.category_mut(&key) {
                    category.options.push(text.trim().to_string());
                }
            }
            SetupAction::RemoveOption { key, index } => {
                if let Some(category) = state.category_mut(&key) {
                    category.options.remove(index);
                }
            }
            SetupAction::FinishCategory(key) => {
                if state.selected_category.as_deref() == Some(key.as_str()) {
                    state.current_input.clear();
                }
                if let Some(category) = state.category_mut(&key) {
                    category.all_options_added = true;
                    info!(key = %key, options = category.options.len(), "Category finished");
                }
            }
            SetupAction::SetMagicNumber(n) => state.magic_number = n,
        }

        #[cfg(debug_assertions)]
        SetupContract::post(&before, &self.state)?;

        Ok(())
    }

    /// Checks whether play can start.
    pub fn check_ready(&self) -> Result<(), SetupError> {
        StartContract::pre(&self.state, &())
    }

    /// Starts the elimination (consumes setup, returns playing).
    #[instrument(skip(self), fields(magic_number = self.state.magic_number))]
    pub fn start(self) -> Result<GamePlaying, SetupError> {
        StartContract::pre(&self.state, &())?;

        #[cfg(debug_assertions)]
        let before = self.state.clone();

        let game = GamePlaying::enter(self.state);

        #[cfg(debug_assertions)]
        StartContract::post(&before, &game.state)?;

        info!(items = game.state.all_items.len(), "Elimination started");
        Ok(game)
    }
}

impl Default for GameSetup {
    fn default() -> Self {
        Self::classic()
    }
}

// ─────────────────────────────────────────────────────────────
//  Playing Phase
// ─────────────────────────────────────────────────────────────

/// What one step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepEvent {
    /// The count visited an item without crossing it.
    Counted {
        /// Index into `all_items`.
        item: usize,
    },
    /// The count reached the magic number and crossed an item.
    Crossed {
        /// Index into `all_items`.
        item: usize,
        /// Groups left with a single survivor by this crossing.
        resolved: Vec<Group>,
    },
}

impl StepEvent {
    /// Index into `all_items` of the visited item.
    pub fn item(&self) -> usize {
        match self {
            StepEvent::Counted { item } | StepEvent::Crossed { item, .. } => *item,
        }
    }
}

/// Game in play: the count walks the elimination sequence.
#[derive(Debug, Clone)]
pub struct GamePlaying {
    pub(crate) state: GameState,
}

impl GamePlaying {
    /// Moves a setup state into play: derives items, resets the cursor,
    /// and resolves single-candidate groups.
    fn enter(mut state: GameState) -> Self {
        state.advance_phase(Phase::Playing);
        state.selected_category = None;
        state.current_input.clear();
        state.animation_running = false;
        state.current_animation_index = 0;
        state.tally = 0;
        state.derive_items();
        let resolved = rules::resolution::resolve_groups(&mut state);
        if !resolved.is_empty() {
            debug!(?resolved, "Groups resolved at start");
        }
        Self { state }
    }

    pub(crate) fn from_state(state: GameState) -> Self {
        Self { state }
    }

    /// Returns the state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// True once every group has a survivor.
    pub fn is_complete(&self) -> bool {
        rules::is_complete(&self.state)
    }

    /// The item under the animation cursor.
    pub fn current_item(&self) -> Option<&Item> {
        let items = self.state.all_items();
        if items.is_empty() {
            return None;
        }
        items.get(self.state.current_animation_index % items.len())
    }

    /// Index into `all_items` of the item the count will cross next.
    pub fn next_crossing(&self) -> Option<usize> {
        let len = self.state.all_items.len();
        rules::next_crossing(&self.state).map(|p| p % len)
    }

    /// Starts the reveal animation.
    ///
    /// Fails if an animation is already running.
    #[instrument(skip(self))]
    pub fn begin_animation(&mut self) -> Result<(), PlayError> {
        if self.state.animation_running {
            warn!("Animation trigger ignored: already running");
            return Err(PlayError::AnimationAlreadyRunning);
        }
        self.state.animation_running = true;
        debug!(cursor = self.state.current_animation_index, "Animation running");
        Ok(())
    }

    /// Pauses the reveal animation.
    #[instrument(skip(self))]
    pub fn pause_animation(&mut self) -> Result<(), PlayError> {
        if !self.state.animation_running {
            return Err(PlayError::AnimationNotRunning);
        }
        self.state.animation_running = false;
        Ok(())
    }

    /// Counts one item, crossing it if the count reaches the magic number.
    ///
    /// Consumes self and returns either a continuing game or the results.
    #[instrument(skip(self), fields(cursor = self.state.current_animation_index, tally = self.state.tally))]
    pub fn step(self) -> Result<PlayTransition, PlayError> {
        #[cfg(debug_assertions)]
        let before = self.state.clone();

        let mut game = self;
        let state = &mut game.state;

        let position = match rules::next_eligible(state, state.current_animation_index) {
            Some(position) if !rules::is_complete(state) => position,
            _ => {
                return Ok(PlayTransition::Finished {
                    results: game.finish(),
                    event: None,
                });
            }
        };

        // Whole laps over the eligible items land on the same item.
        let needed = rules::visits_needed(state);
        state.tally = state.magic_number.saturating_sub(needed);

        let item = position % state.all_items.len();
        state.current_animation_index = position + 1;
        state.tally += 1;

        let event = if state.tally >= state.magic_number {
            state.tally = 0;
            state.cross(item);
            let resolved = rules::resolution::resolve_groups(state);
            debug!(item, label = ?state.item_label(&state.all_items[item]), "Crossed");
            StepEvent::Crossed { item, resolved }
        } else {
            StepEvent::Counted { item }
        };

        #[cfg(debug_assertions)]
        StepContract::post(&before, &game.state)?;

        if game.is_complete() {
            return Ok(PlayTransition::Finished {
                results: game.finish(),
                event: Some(event),
            });
        }

        Ok(PlayTransition::Playing { game, event })
    }

    /// Steps until every group has a survivor.
    #[instrument(skip(self))]
    pub fn run_to_completion(self) -> Result<GameResults, PlayError> {
        let mut game = self;
        loop {
            match game.step()? {
                PlayTransition::Playing { game: next, .. } => game = next,
                PlayTransition::Finished { results, .. } => return Ok(results),
            }
        }
    }

    /// Clears every crossing and restarts the count from the first item.
    #[instrument(skip(self))]
    pub fn rewind(self) -> GamePlaying {
        let mut state = self.state;
        state.clear_elimination();
        GamePlaying::enter(state)
    }

    fn finish(mut self) -> GameResults {
        self.state.animation_running = false;
        self.state.advance_phase(Phase::Results);
        let fortune = Fortune::from_state(&self.state);
        info!(%fortune, "Elimination finished");
        GameResults {
            state: self.state,
            fortune,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Results Phase
// ─────────────────────────────────────────────────────────────

/// A surviving option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    /// Category label.
    pub category: String,
    /// Surviving option.
    pub option: String,
}

/// The survivors of a finished elimination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fortune {
    letter: Option<char>,
    home: Option<Home>,
    picks: Vec<Pick>,
}

impl Fortune {
    /// Reads the survivors of a state, in display order.
    pub fn from_state(state: &GameState) -> Self {
        let letter = state.selected_letter().map(|cell| cell.letter());
        let picks = state
            .categories_in_order()
            .filter_map(|category| {
                category.selected_option().map(|option| Pick {
                    category: category.display_name().to_string(),
                    option: option.to_string(),
                })
            })
            .collect();
        Self {
            letter,
            home: letter.and_then(Home::from_letter),
            picks,
        }
    }

    /// The surviving letter.
    pub fn letter(&self) -> Option<char> {
        self.letter
    }

    /// The home the surviving letter stands for.
    pub fn home(&self) -> Option<Home> {
        self.home
    }

    /// One pick per resolved category.
    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }
}

impl std::fmt::Display for Fortune {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.home, self.letter) {
            (Some(home), Some(letter)) => write!(f, "You will live in a {} ({})", home, letter)?,
            (None, Some(letter)) => write!(f, "Your letter is {}", letter)?,
            _ => write!(f, "No letter survived")?,
        }
        for pick in &self.picks {
            write!(f, "\n{}: {}", pick.category, pick.option)?;
        }
        Ok(())
    }
}

/// Game finished: every group has a survivor.
#[derive(Debug, Clone)]
pub struct GameResults {
    state: GameState,
    fortune: Fortune,
}

impl GameResults {
    pub(crate) fn from_state(state: GameState) -> Self {
        let fortune = Fortune::from_state(&state);
        Self { state, fortune }
    }

    pub(crate) fn into_state(self) -> GameState {
        self.state
    }

    /// Returns the fortune.
    pub fn fortune(&self) -> &Fortune {
        &self.fortune
    }

    /// Returns the state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Starts over with the classic categories (consumes results, returns setup).
    #[instrument(skip(self))]
    pub fn restart(self) -> GameSetup {
        let letters: String = self.state.mash_letters().iter().map(|c| c.letter()).collect();
        GameSetup::with_categories(&letters, default_categories())
    }

    /// Plays the same options again with a fresh count.
    ///
    /// Categories stay finished; the magic number is kept.
    #[instrument(skip(self))]
    pub fn play_again(self) -> GameSetup {
        let mut state = self.state;
        state.clear_elimination();
        GameSetup::from_state(state)
    }
}

// ─────────────────────────────────────────────────────────────
//  Result Type
// ─────────────────────────────────────────────────────────────

/// Result of one step.
#[derive(Debug)]
pub enum PlayTransition {
    /// Elimination continues.
    Playing {
        /// The game, one step further.
        game: GamePlaying,
        /// What the step did.
        event: StepEvent,
    },
    /// Every group has a survivor.
    Finished {
        /// The finished game.
        results: GameResults,
        /// What the final step did, if it did anything.
        event: Option<StepEvent>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(letters: &str, categories: &[(&str, &[&str])], magic: u32) -> GameSetup {
        let mut setup = GameSetup::new(letters);
        for (key, options) in categories {
            setup
                .apply(SetupAction::AddCategory {
                    key: key.to_string(),
                    display_name: key.to_uppercase(),
                })
                .unwrap();
            for text in *options {
                setup
                    .apply(SetupAction::AddOption {
                        key: key.to_string(),
                        text: text.to_string(),
                    })
                    .unwrap();
            }
            setup.apply(SetupAction::FinishCategory(key.to_string())).unwrap();
        }
        setup.apply(SetupAction::SetMagicNumber(magic)).unwrap();
        setup
    }

    #[test]
    fn test_typing_and_committing() {
        let mut setup = GameSetup::classic();
        setup.apply(SetupAction::SelectCategory(Some("car".into()))).unwrap();
        for c in " Van ".chars() {
            setup.apply(SetupAction::TypeChar(c)).unwrap();
        }
        setup.apply(SetupAction::Backspace).unwrap();
        setup.apply(SetupAction::CommitInput).unwrap();

        let car = setup.state().category("car").unwrap();
        assert_eq!(car.options(), ["Van"]);
        assert!(setup.state().current_input().is_empty());
    }

    #[test]
    fn test_switching_focus_clears_input() {
        let mut setup = GameSetup::classic();
        setup.apply(SetupAction::SelectCategory(Some("car".into()))).unwrap();
        setup.apply(SetupAction::TypeChar('x')).unwrap();
        setup.apply(SetupAction::SelectCategory(Some("job".into()))).unwrap();
        assert!(setup.state().current_input().is_empty());
    }

    #[test]
    fn test_duplicate_option_rejected() {
        let mut setup = ready("MASH", &[], 3);
        setup
            .apply(SetupAction::AddCategory {
                key: "car".into(),
                display_name: "Car".into(),
            })
            .unwrap();
        let add = SetupAction::AddOption {
            key: "car".into(),
            text: "Van".into(),
        };
        setup.apply(add.clone()).unwrap();
        assert_eq!(setup.apply(add), Err(SetupError::DuplicateOption("Van".into())));
    }

    #[test]
    fn test_finished_category_is_immutable() {
        let mut setup = ready("MASH", &[("car", &["Van", "Jet"])], 3);
        let result = setup.apply(SetupAction::RemoveOption {
            key: "car".into(),
            index: 0,
        });
        assert!(matches!(result, Err(SetupError::CategoryLocked(_))));
        assert_eq!(setup.state().category("car").unwrap().options().len(), 2);
    }

    #[test]
    fn test_start_derives_items() {
        let game = ready("MASH", &[("car", &["a", "b", "c"]), ("job", &["d", "e", "f"])], 3)
            .start()
            .unwrap();
        assert_eq!(game.state().phase(), Phase::Playing);
        assert_eq!(game.state().all_items().len(), 10);
        assert_eq!(game.state().current_animation_index(), 0);
    }

    #[test]
    fn test_first_crossing_lands_on_magic_number() {
        let mut game = ready("MASH", &[("car", &["a", "b", "c"])], 3).start().unwrap();
        let mut events = Vec::new();
        for _ in 0..3 {
            match game.step().unwrap() {
                PlayTransition::Playing { game: next, event } => {
                    events.push(event);
                    game = next;
                }
                PlayTransition::Finished { .. } => panic!("finished too early"),
            }
        }
        assert_eq!(events[0], StepEvent::Counted { item: 0 });
        assert_eq!(events[1], StepEvent::Counted { item: 1 });
        assert!(matches!(events[2], StepEvent::Crossed { item: 2, .. }));
        assert!(game.state().mash_letters()[2].crossed());
    }

    #[test]
    fn test_next_crossing_predicts_the_cross() {
        let mut game = ready("MASH", &[("car", &["a", "b", "c"])], 5).start().unwrap();
        for _ in 0..4 {
            let predicted = game.next_crossing();
            let crossed = loop {
                match game.step().unwrap() {
                    PlayTransition::Playing { game: next, event } => {
                        game = next;
                        if let StepEvent::Crossed { item, .. } = event {
                            break item;
                        }
                    }
                    PlayTransition::Finished { .. } => panic!("finished too early"),
                }
            };
            assert_eq!(predicted, Some(crossed));
        }
    }

    #[test]
    fn test_huge_magic_number_skips_whole_laps() {
        // Seven eligible items, so 3 + 7k lands where 3 does.
        let magic = 3 + 7 * 600_000_000;
        let mut game = ready("MASH", &[("car", &["a", "b", "c"])], magic).start().unwrap();
        let mut visits = 0;
        let crossed = loop {
            visits += 1;
            match game.step().unwrap() {
                PlayTransition::Playing { game: next, event } => {
                    game = next;
                    if let StepEvent::Crossed { item, .. } = event {
                        break item;
                    }
                }
                PlayTransition::Finished { .. } => panic!("finished too early"),
            }
        };
        assert_eq!(visits, 3);
        assert_eq!(crossed, 2);
        assert_eq!(game.state().tally(), 0);
    }

    #[test]
    fn test_max_magic_number_completes() {
        let results = ready("MASH", &[("car", &["a", "b", "c"]), ("job", &["x", "y"])], u32::MAX)
            .start()
            .unwrap()
            .run_to_completion()
            .unwrap();
        assert_eq!(results.fortune().picks().len(), 2);
    }

    #[test]
    fn test_animation_guard() {
        let mut game = ready("MASH", &[("car", &["a", "b"])], 2).start().unwrap();
        game.begin_animation().unwrap();
        assert_eq!(game.begin_animation(), Err(PlayError::AnimationAlreadyRunning));
        game.pause_animation().unwrap();
        assert_eq!(game.pause_animation(), Err(PlayError::AnimationNotRunning));
    }

    #[test]
    fn test_cursor_is_monotonic() {
        let mut game = ready("MASH", &[("car", &["a", "b", "c"])], 4).start().unwrap();
        let mut last = game.state().current_animation_index();
        loop {
            match game.step().unwrap() {
                PlayTransition::Playing { game: next, .. } => {
                    assert!(next.state().current_animation_index() > last);
                    last = next.state().current_animation_index();
                    game = next;
                }
                PlayTransition::Finished { .. } => break,
            }
        }
    }

    #[test]
    fn test_single_option_groups_finish_immediately() {
        let game = ready("M", &[("car", &["Van"])], 5).start().unwrap();
        assert!(game.is_complete());
        match game.step().unwrap() {
            PlayTransition::Finished { results, event } => {
                assert_eq!(event, None);
                assert_eq!(results.fortune().letter(), Some('M'));
                assert_eq!(results.fortune().picks()[0].option, "Van");
            }
            PlayTransition::Playing { .. } => panic!("should be finished"),
        }
    }

    #[test]
    fn test_rewind_restores_fresh_play() {
        let game = ready("MASH", &[("car", &["a", "b", "c"])], 2).start().unwrap();
        let fresh = game.state().clone();
        let game = match game.step().unwrap() {
            PlayTransition::Playing { game, .. } => game,
            PlayTransition::Finished { .. } => panic!("finished too early"),
        };
        let game = match game.step().unwrap() {
            PlayTransition::Playing { game, .. } => game,
            PlayTransition::Finished { .. } => panic!("finished too early"),
        };
        assert!(game.state().all_items().iter().any(|i| i.crossed()));
        let rewound = game.rewind();
        assert_eq!(rewound.state(), &fresh);
    }

    #[test]
    fn test_play_again_keeps_options() {
        let results = ready("MASH", &[("car", &["a", "b", "c"])], 2)
            .start()
            .unwrap()
            .run_to_completion()
            .unwrap();
        let setup = results.play_again();
        let car = setup.state().category("car").unwrap();
        assert_eq!(setup.state().phase(), Phase::Setup);
        assert_eq!(car.options().len(), 3);
        assert!(car.all_options_added());
        assert_eq!(car.selected_index(), None);
        assert!(setup.check_ready().is_ok());
    }

    #[test]
    fn test_restart_uses_classic_categories() {
        let results = ready("MASH", &[("car", &["a", "b"])], 2)
            .start()
            .unwrap()
            .run_to_completion()
            .unwrap();
        let setup = results.restart();
        assert_eq!(setup.state().category_order().len(), 5);
        assert!(setup.state().categories().values().all(|c| c.options().is_empty()));
    }

    #[test]
    fn test_fortune_display() {
        let results = ready("MASH", &[("car", &["Van", "Jet"])], 1)
            .start()
            .unwrap()
            .run_to_completion()
            .unwrap();
        let text = results.fortune().to_string();
        assert!(text.starts_with("You will live in a "));
        assert!(text.contains("CAR: "));
    }
}
