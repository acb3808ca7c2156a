//! Application state and logic.

use super::input::{Command, command_for};
use crate::config::{ConfigError, GameConfig};
use crossterm::event::KeyEvent;
use std::time::Duration;
use strictly_mash::{AnyGame, GameSetup, Phase, PlayTransition, SetupAction, StepEvent};
use tracing::{debug, info, instrument, warn};

/// Main application state.
pub struct App {
    game: AnyGame,
    status_message: String,
    config: GameConfig,
    should_quit: bool,
}

impl App {
    /// Creates an app in setup, loaded from the config.
    #[instrument(skip(config))]
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let setup = config.to_setup(false)?;
        let mut app = Self {
            game: setup.into(),
            status_message: "Type options, Enter to add, Tab to finish a category".to_string(),
            config,
            should_quit: false,
        };
        app.focus_first_open();
        Ok(app)
    }

    /// Gets the current game.
    pub fn game(&self) -> &AnyGame {
        &self.game
    }

    /// Gets the current status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// True once the player asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Interval between animation steps.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(*self.config.tick_millis())
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let state = self.game.state();
        let input_empty = state.current_input().is_empty();
        if let Some(command) = command_for(state.phase(), key, input_empty) {
            self.execute(command);
        }
    }

    /// Advances the animation by one step while it is running.
    pub fn on_tick(&mut self) {
        if let AnyGame::Playing(game) = &self.game
            && game.state().animation_running()
        {
            self.step();
        }
    }

    /// Runs a command against the current phase.
    #[instrument(skip(self), fields(phase = %self.game.phase()))]
    pub fn execute(&mut self, command: Command) {
        debug!(?command, "Executing command");
        match command {
            Command::Quit => {
                info!("Quit requested");
                self.should_quit = true;
            }
            Command::FocusPrev => self.move_focus(-1),
            Command::FocusNext => self.move_focus(1),
            Command::Type(c) => self.edit(SetupAction::TypeChar(c)),
            Command::Backspace => self.backspace(),
            Command::Commit => self.edit(SetupAction::CommitInput),
            Command::FinishCategory => self.finish_category(),
            Command::MagicUp => self.adjust_magic(1),
            Command::MagicDown => self.adjust_magic(-1),
            Command::Start => self.start(),
            Command::ToggleAnimation => self.toggle_animation(),
            Command::Step => self.step(),
            Command::FinishNow => self.finish_now(),
            Command::Rewind => self.rewind(),
            Command::PlayAgain => self.play_again(),
            Command::Restart => self.restart(),
        }
    }

    fn setup_mut(&mut self) -> Option<&mut GameSetup> {
        match &mut self.game {
            AnyGame::Setup(setup) => Some(setup),
            _ => None,
        }
    }

    fn edit(&mut self, action: SetupAction) {
        let Some(setup) = self.setup_mut() else {
            return;
        };
        if let Err(e) = setup.apply(action) {
            debug!(error = %e, "Setup edit rejected");
            self.status_message = e.to_string();
        }
    }

    fn focused_key(&self) -> Option<String> {
        self.game.state().selected_category().map(str::to_string)
    }

    fn move_focus(&mut self, delta: isize) {
        let order = self.game.state().category_order();
        if order.is_empty() {
            return;
        }
        let len = order.len() as isize;
        let current = self
            .focused_key()
            .and_then(|key| order.iter().position(|k| *k == key))
            .map_or(-1, |i| i as isize);
        let next = if current < 0 && delta < 0 {
            len - 1
        } else {
            (current + delta).rem_euclid(len)
        };
        let key = order[next as usize].clone();
        self.edit(SetupAction::SelectCategory(Some(key)));
    }

    /// Focuses the first unfinished category, or clears focus if none is left.
    fn focus_first_open(&mut self) {
        let key = self
            .game
            .state()
            .categories_in_order()
            .find(|c| !c.all_options_added())
            .map(|c| c.name().to_string());
        self.edit(SetupAction::SelectCategory(key));
    }

    fn backspace(&mut self) {
        let state = self.game.state();
        if !state.current_input().is_empty() {
            self.edit(SetupAction::Backspace);
            return;
        }
        let Some(key) = self.focused_key() else {
            return;
        };
        let last = state
            .category(&key)
            .filter(|c| !c.all_options_added())
            .and_then(|c| c.options().len().checked_sub(1));
        if let Some(index) = last {
            self.edit(SetupAction::RemoveOption { key, index });
        }
    }

    fn finish_category(&mut self) {
        let Some(key) = self.focused_key() else {
            self.status_message = "Select a category first".to_string();
            return;
        };
        let Some(setup) = self.setup_mut() else {
            return;
        };
        match setup.apply(SetupAction::FinishCategory(key.clone())) {
            Ok(()) => {
                self.focus_first_open();
                self.status_message = match self.focused_key() {
                    Some(next) => format!("{} locked, now filling {}", key, next),
                    None => "All categories locked. Press F5 to start".to_string(),
                };
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    fn adjust_magic(&mut self, delta: i64) {
        let current = i64::from(self.game.state().magic_number());
        let next = (current + delta).clamp(1, i64::from(u32::MAX));
        if let Ok(n) = u32::try_from(next) {
            self.edit(SetupAction::SetMagicNumber(n));
            self.status_message = format!("Magic number {}", n);
        }
    }

    fn start(&mut self) {
        let AnyGame::Setup(setup) = &self.game else {
            return;
        };
        match setup.clone().start() {
            Ok(mut game) => {
                if let Err(e) = game.begin_animation() {
                    warn!(error = %e, "Animation did not start");
                }
                self.status_message = "Counting... Space to pause, n to step".to_string();
                self.game = game.into();
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    fn toggle_animation(&mut self) {
        if let AnyGame::Playing(game) = &mut self.game {
            let toggled = if game.state().animation_running() {
                game.pause_animation()
            } else {
                game.begin_animation()
            };
            match toggled {
                Ok(()) if game.state().animation_running() => {
                    self.status_message = "Counting...".to_string();
                }
                Ok(()) => self.status_message = "Paused".to_string(),
                Err(e) => self.status_message = e.to_string(),
            }
        }
    }

    fn step(&mut self) {
        let AnyGame::Playing(game) = &self.game else {
            return;
        };
        match game.clone().step() {
            Ok(transition) => {
                self.describe(&transition);
                self.game = transition.into();
            }
            Err(e) => {
                warn!(error = %e, "Step failed");
                self.status_message = e.to_string();
            }
        }
    }

    fn describe(&mut self, transition: &PlayTransition) {
        let (state, event) = match transition {
            PlayTransition::Playing { game, event } => (game.state(), Some(event)),
            PlayTransition::Finished { results, event } => (results.state(), event.as_ref()),
        };
        if let Some(StepEvent::Crossed { item, resolved }) = event {
            let label = state
                .all_items()
                .get(*item)
                .and_then(|it| state.item_label(it))
                .unwrap_or_default();
            self.status_message = format!("Crossed out {}", label);
            for group in resolved {
                self.status_message.push_str(&format!(", {} decided", group));
            }
        }
        if let PlayTransition::Finished { results, .. } = transition {
            self.status_message = results.fortune().to_string().lines().next().unwrap_or_default().to_string();
        }
    }

    fn finish_now(&mut self) {
        let AnyGame::Playing(game) = &self.game else {
            return;
        };
        match game.clone().run_to_completion() {
            Ok(results) => {
                self.status_message = format!("Done. Magic number was {}", results.state().magic_number());
                self.game = results.into();
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    fn rewind(&mut self) {
        let game = std::mem::take(&mut self.game);
        self.game = match game {
            AnyGame::Playing(playing) => {
                self.status_message = "Rewound. Space to count again".to_string();
                playing.rewind().into()
            }
            other => other,
        };
    }

    fn play_again(&mut self) {
        let game = std::mem::take(&mut self.game);
        self.game = match game {
            AnyGame::Results(results) => {
                self.status_message = "Same options. F5 to count again, +/- to change the number".to_string();
                results.play_again().into()
            }
            other => other,
        };
    }

    fn restart(&mut self) {
        let game = std::mem::take(&mut self.game);
        self.game = match game {
            AnyGame::Results(results) => {
                let mut setup = results.restart();
                let magic = self.config.resolve_magic_number();
                if let Err(e) = setup.apply(SetupAction::SetMagicNumber(magic)) {
                    warn!(error = %e, "Could not set magic number");
                }
                self.status_message = "New game".to_string();
                setup.into()
            }
            other => other,
        };
        if self.game.phase() == Phase::Setup {
            self.focus_first_open();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn config() -> GameConfig {
        GameConfig::from_toml(
            r#"
            magic_number = 3

            [[categories]]
            key = "car"
            display_name = "Car"
            options = ["Van", "Bike"]

            [[categories]]
            key = "job"
            display_name = "Job"
            options = ["Chef", "Pilot", "Vet"]
            finished = true
            "#,
        )
        .unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_new_focuses_first_unfinished() {
        let app = App::new(config()).unwrap();
        assert_eq!(app.game().state().selected_category(), Some("car"));
    }

    #[test]
    fn test_typing_adds_option() {
        let mut app = App::new(config()).unwrap();
        type_text(&mut app, "Jeep");
        press(&mut app, KeyCode::Enter);
        let car = app.game().state().category("car").unwrap();
        assert_eq!(car.options().last().map(String::as_str), Some("Jeep"));
        assert!(app.game().state().current_input().is_empty());
    }

    #[test]
    fn test_backspace_on_empty_input_removes_last_option() {
        let mut app = App::new(config()).unwrap();
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.game().state().category("car").unwrap().options(), ["Van"]);
    }

    #[test]
    fn test_start_before_finishing_reports_error() {
        let mut app = App::new(config()).unwrap();
        press(&mut app, KeyCode::F(5));
        assert_eq!(app.game().phase(), Phase::Setup);
        assert!(!app.status_message().is_empty());
    }

    #[test]
    fn test_magic_keys() {
        let mut app = App::new(config()).unwrap();
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.game().state().magic_number(), 4);
        for _ in 0..10 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.game().state().magic_number(), 1);
    }

    #[test]
    fn test_full_round() {
        let mut app = App::new(config()).unwrap();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.game().state().selected_category(), None);

        press(&mut app, KeyCode::F(5));
        assert_eq!(app.game().phase(), Phase::Playing);
        assert!(app.game().state().animation_running());

        press(&mut app, KeyCode::Char(' '));
        assert!(!app.game().state().animation_running());
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.game().state().current_animation_index(), 1);

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.game().phase(), Phase::Results);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.game().phase(), Phase::Setup);
        assert!(app.game().state().all_items().is_empty());
        assert_eq!(app.game().state().magic_number(), 3);

        press(&mut app, KeyCode::F(5));
        assert_eq!(app.game().phase(), Phase::Playing);
    }

    #[test]
    fn test_ticks_run_to_results() {
        let mut app = App::new(config()).unwrap();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::F(5));
        for _ in 0..200 {
            app.on_tick();
        }
        assert_eq!(app.game().phase(), Phase::Results);
        assert!(app.status_message().starts_with("You will live in a"));
    }

    #[test]
    fn test_restart_returns_classic_categories() {
        let mut app = App::new(config()).unwrap();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::F(5));
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char('r'));
        let state = app.game().state();
        assert_eq!(state.phase(), Phase::Setup);
        assert_eq!(state.category_order().len(), 5);
        assert_eq!(state.selected_category(), Some("spouse"));
    }

    #[test]
    fn test_escape_quits() {
        let mut app = App::new(config()).unwrap();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }
}
