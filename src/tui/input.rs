//! Key bindings for each phase.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strictly_mash::Phase;

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the app.
    Quit,
    /// Focus the previous category.
    FocusPrev,
    /// Focus the next category.
    FocusNext,
    /// Type into the input buffer.
    Type(char),
    /// Delete the last input character, or the last option when the input is empty.
    Backspace,
    /// Commit the input as an option.
    Commit,
    /// Lock the focused category.
    FinishCategory,
    /// Raise the magic number.
    MagicUp,
    /// Lower the magic number.
    MagicDown,
    /// Start the elimination.
    Start,
    /// Run or pause the animation.
    ToggleAnimation,
    /// Count one item.
    Step,
    /// Run the elimination to the end.
    FinishNow,
    /// Clear the crossings and count again.
    Rewind,
    /// Same options, fresh count.
    PlayAgain,
    /// Back to the classic categories.
    Restart,
}

/// Maps a key press to a command for the current phase.
///
/// `input_empty` tells setup whether `+` and `-` type or adjust the magic number.
pub fn command_for(phase: Phase, key: KeyEvent, input_empty: bool) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match phase {
        Phase::Setup => match key.code {
            KeyCode::Esc => Some(Command::Quit),
            KeyCode::F(5) => Some(Command::Start),
            KeyCode::Char('s') if ctrl => Some(Command::Start),
            KeyCode::Up => Some(Command::FocusPrev),
            KeyCode::Down => Some(Command::FocusNext),
            KeyCode::Enter => Some(Command::Commit),
            KeyCode::Backspace => Some(Command::Backspace),
            KeyCode::Tab => Some(Command::FinishCategory),
            KeyCode::Char('+') if input_empty => Some(Command::MagicUp),
            KeyCode::Char('-') if input_empty => Some(Command::MagicDown),
            KeyCode::Char(c) if !ctrl => Some(Command::Type(c)),
            _ => None,
        },
        Phase::Playing => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char(' ') => Some(Command::ToggleAnimation),
            KeyCode::Char('n') => Some(Command::Step),
            KeyCode::Char('f') => Some(Command::FinishNow),
            KeyCode::Char('r') => Some(Command::Rewind),
            _ => None,
        },
        Phase::Results => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('a') => Some(Command::PlayAgain),
            KeyCode::Char('r') => Some(Command::Restart),
            _ => None,
        },
    }
}
