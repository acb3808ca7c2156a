//! Core domain types for MASH.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::instrument;

/// Phase of a play-through.
///
/// Phases only move forward. Going back to [`Phase::Setup`] happens
/// through a reset, never through a transition.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Categories and letters are being filled in.
    #[default]
    #[display("setup")]
    Setup,
    /// Elimination is running.
    #[display("playing")]
    Playing,
    /// Every group has a survivor.
    #[display("results")]
    Results,
}

impl Phase {
    /// Returns true if `next` is the phase directly after this one.
    #[instrument]
    pub fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Setup, Phase::Playing) | (Phase::Playing, Phase::Results)
        )
    }
}

/// One game topic and the candidate answers entered for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub(crate) name: String,
    pub(crate) display_name: String,
    pub(crate) options: Vec<String>,
    pub(crate) all_options_added: bool,
    pub(crate) selected_index: Option<usize>,
    #[serde(default)]
    pub(crate) crossed_options: BTreeSet<usize>,
}

impl Category {
    /// Creates an empty, unlocked category.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            options: Vec::new(),
            all_options_added: false,
            selected_index: None,
            crossed_options: BTreeSet::new(),
        }
    }

    /// Stable key of the category.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Candidate answers in entry order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// True once no more options may be added or removed.
    pub fn all_options_added(&self) -> bool {
        self.all_options_added
    }

    /// Index of the surviving option, once resolved.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Indices that have been crossed out.
    pub fn crossed_options(&self) -> &BTreeSet<usize> {
        &self.crossed_options
    }

    /// The surviving option text, once resolved.
    pub fn selected_option(&self) -> Option<&str> {
        self.selected_index
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    /// True if the option at `index` has been crossed out.
    pub fn is_crossed(&self, index: usize) -> bool {
        self.crossed_options.contains(&index)
    }

    /// Number of options not crossed out.
    pub fn remaining(&self) -> usize {
        self.options.len().saturating_sub(self.crossed_options.len())
    }

    /// Clears elimination progress, keeping the options.
    pub(crate) fn clear_elimination(&mut self) {
        self.selected_index = None;
        self.crossed_options.clear();
    }
}

/// A letter of the title word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MashLetter {
    pub(crate) letter: char,
    pub(crate) crossed: bool,
    pub(crate) selected: bool,
}

impl MashLetter {
    /// Creates an uncrossed, unselected letter cell.
    pub fn new(letter: char) -> Self {
        Self {
            letter,
            crossed: false,
            selected: false,
        }
    }

    /// The letter.
    pub fn letter(&self) -> char {
        self.letter
    }

    /// True if eliminated.
    pub fn crossed(&self) -> bool {
        self.crossed
    }

    /// True if this is the surviving letter.
    pub fn selected(&self) -> bool {
        self.selected
    }

    /// The home this letter stands for, if it is one of the classic four.
    pub fn home(&self) -> Option<Home> {
        Home::from_letter(self.letter)
    }
}

/// Where an eliminable item comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A letter of the title word.
    Mash,
    /// An option of a category.
    Category,
}

/// One entry of the flattened elimination sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "type")]
    pub(crate) kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) category_key: Option<String>,
    pub(crate) index: usize,
    pub(crate) crossed: bool,
}

impl Item {
    /// Creates an item for the letter at `index`.
    pub fn letter(index: usize) -> Self {
        Self {
            kind: ItemKind::Mash,
            category_key: None,
            index,
            crossed: false,
        }
    }

    /// Creates an item for option `index` of category `key`.
    pub fn option(key: impl Into<String>, index: usize) -> Self {
        Self {
            kind: ItemKind::Category,
            category_key: Some(key.into()),
            index,
            crossed: false,
        }
    }

    /// Origin of the item.
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Category key, for category items.
    pub fn category_key(&self) -> Option<&str> {
        self.category_key.as_deref()
    }

    /// Index within the origin collection.
    pub fn index(&self) -> usize {
        self.index
    }

    /// True if eliminated.
    pub fn crossed(&self) -> bool {
        self.crossed
    }

    /// True if both items belong to the same group.
    pub fn same_group(&self, other: &Item) -> bool {
        self.kind == other.kind && self.category_key == other.category_key
    }
}

/// The classic meaning of each letter of "MASH".
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum Home {
    /// M
    Mansion,
    /// A
    Apartment,
    /// S
    Shack,
    /// H
    House,
}

impl Home {
    /// Maps a letter (case-insensitive) to its home.
    #[instrument]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'M' => Some(Home::Mansion),
            'A' => Some(Home::Apartment),
            'S' => Some(Home::Shack),
            'H' => Some(Home::House),
            _ => None,
        }
    }

    /// The letter for this home.
    pub fn letter(self) -> char {
        match self {
            Home::Mansion => 'M',
            Home::Apartment => 'A',
            Home::Shack => 'S',
            Home::House => 'H',
        }
    }
}
