//! First-class setup actions and the errors phases can report.
//!
//! Setup edits are domain events: they can be validated by a contract
//! before they touch the state, logged, and replayed.

use serde::{Deserialize, Serialize};

/// An edit made while the game is in setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupAction {
    /// Adds a new, empty category at the end of the display order.
    AddCategory {
        /// Stable key.
        key: String,
        /// Human-readable label.
        display_name: String,
    },
    /// Focuses a category for typing, or clears focus.
    SelectCategory(Option<String>),
    /// Appends a character to the input buffer.
    TypeChar(char),
    /// Removes the last character of the input buffer.
    Backspace,
    /// Commits the input buffer as an option of the focused category.
    CommitInput,
    /// Adds an option to a category directly.
    AddOption {
        /// Category key.
        key: String,
        /// Option text.
        text: String,
    },
    /// Removes an option from an unlocked category.
    RemoveOption {
        /// Category key.
        key: String,
        /// Index of the option.
        index: usize,
    },
    /// Locks a category's options.
    FinishCategory(String),
    /// Chooses the counting interval.
    SetMagicNumber(u32),
}

impl std::fmt::Display for SetupAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupAction::AddCategory { key, .. } => write!(f, "add category {}", key),
            SetupAction::SelectCategory(Some(key)) => write!(f, "select {}", key),
            SetupAction::SelectCategory(None) => write!(f, "clear selection"),
            SetupAction::TypeChar(c) => write!(f, "type {:?}", c),
            SetupAction::Backspace => write!(f, "backspace"),
            SetupAction::CommitInput => write!(f, "commit input"),
            SetupAction::AddOption { key, text } => write!(f, "add {:?} to {}", text, key),
            SetupAction::RemoveOption { key, index } => write!(f, "remove {} from {}", index, key),
            SetupAction::FinishCategory(key) => write!(f, "finish {}", key),
            SetupAction::SetMagicNumber(n) => write!(f, "magic number {}", n),
        }
    }
}

/// Error that can occur when validating or applying a setup action.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SetupError {
    /// No category has this key.
    #[display("Unknown category {:?}", _0)]
    UnknownCategory(String),

    /// Category keys must not be blank.
    #[display("Invalid category key {:?}", _0)]
    InvalidCategoryKey(String),

    /// A category with this key already exists.
    #[display("Category {:?} already exists", _0)]
    DuplicateCategory(String),

    /// Typing or committing needs a focused category.
    #[display("No category selected")]
    NoCategorySelected,

    /// The category's options are final.
    #[display("Category {:?} is locked", _0)]
    CategoryLocked(String),

    /// Option text is blank.
    #[display("Option text is empty")]
    EmptyOption,

    /// The category already has this option.
    #[display("{:?} is already an option", _0)]
    DuplicateOption(String),

    /// No option at this index.
    #[display("Option {} is out of range", _0)]
    OptionOutOfRange(usize),

    /// A category needs at least one option.
    #[display("Category {:?} has no options", _0)]
    EmptyCategory(String),

    /// Play cannot start while a category is still open.
    #[display("Category {:?} is not finished", _0)]
    CategoryNotFinished(String),

    /// Play needs at least one category.
    #[display("No categories to play")]
    NoCategories,

    /// Play needs at least one letter.
    #[display("No letters to play")]
    NoLetters,

    /// The magic number must be at least 1.
    #[display("Invalid magic number {}", _0)]
    InvalidMagicNumber(u32),

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for SetupError {}

/// Error that can occur while the elimination is running.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PlayError {
    /// A second animation was triggered.
    #[display("Animation is already running")]
    AnimationAlreadyRunning,

    /// Pause requested with no animation running.
    #[display("Animation is not running")]
    AnimationNotRunning,

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for PlayError {}
