//! The session aggregate shared by every phase.

use super::types::{Category, Item, ItemKind, MashLetter, Phase};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// Complete state of one play-through.
///
/// Phase-specific operations live on the typestate wrappers
/// ([`crate::GameSetup`], [`crate::GamePlaying`], [`crate::GameResults`]);
/// this struct is the shape they share and the shape that gets saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub(crate) phase: Phase,
    pub(crate) selected_category: Option<String>,
    pub(crate) current_input: String,
    pub(crate) mash_letters: Vec<MashLetter>,
    pub(crate) categories: BTreeMap<String, Category>,
    /// Display order of category keys.
    #[serde(default)]
    pub(crate) category_order: Vec<String>,
    pub(crate) magic_number: u32,
    pub(crate) animation_running: bool,
    pub(crate) current_animation_index: usize,
    /// Items counted since the last crossing.
    #[serde(default)]
    pub(crate) tally: u32,
    pub(crate) all_items: Vec<Item>,
}

impl GameState {
    /// Creates a setup-phase state spelling `letters`.
    ///
    /// Whitespace is dropped and letters are upper-cased.
    #[instrument]
    pub fn new(letters: &str) -> Self {
        let mash_letters = letters
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| MashLetter::new(c.to_ascii_uppercase()))
            .collect();
        Self {
            phase: Phase::Setup,
            selected_category: None,
            current_input: String::new(),
            mash_letters,
            categories: BTreeMap::new(),
            category_order: Vec::new(),
            magic_number: 0,
            animation_running: false,
            current_animation_index: 0,
            tally: 0,
            all_items: Vec::new(),
        }
    }

    /// Returns the phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the focused category key.
    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    /// Returns the input buffer.
    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    /// Returns the letter cells.
    pub fn mash_letters(&self) -> &[MashLetter] {
        &self.mash_letters
    }

    /// Returns the categories by key.
    pub fn categories(&self) -> &BTreeMap<String, Category> {
        &self.categories
    }

    /// Returns the category keys in display order.
    pub fn category_order(&self) -> &[String] {
        &self.category_order
    }

    /// Returns the magic number (0 until chosen).
    pub fn magic_number(&self) -> u32 {
        self.magic_number
    }

    /// Returns true while the reveal animation is stepping.
    pub fn animation_running(&self) -> bool {
        self.animation_running
    }

    /// Returns the absolute cursor into the cyclic walk of `all_items`.
    pub fn current_animation_index(&self) -> usize {
        self.current_animation_index
    }

    /// Returns the number of items counted since the last crossing.
    pub fn tally(&self) -> u32 {
        self.tally
    }

    /// Returns the flattened elimination sequence.
    pub fn all_items(&self) -> &[Item] {
        &self.all_items
    }

    /// Looks up a category by key.
    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.get(key)
    }

    /// Iterates categories in display order.
    pub fn categories_in_order(&self) -> impl Iterator<Item = &Category> {
        self.category_order
            .iter()
            .filter_map(|key| self.categories.get(key))
    }

    /// Total number of options across every category.
    pub fn option_count(&self) -> usize {
        self.categories.values().map(|c| c.options.len()).sum()
    }

    /// Human-readable text of an item: its letter or its option.
    pub fn item_label(&self, item: &Item) -> Option<String> {
        match item.kind {
            ItemKind::Mash => self
                .mash_letters
                .get(item.index)
                .map(|cell| cell.letter.to_string()),
            ItemKind::Category => item
                .category_key
                .as_deref()
                .and_then(|key| self.categories.get(key))
                .and_then(|category| category.options.get(item.index))
                .cloned(),
        }
    }

    /// Returns the surviving letter, once resolved.
    pub fn selected_letter(&self) -> Option<&MashLetter> {
        self.mash_letters.iter().find(|cell| cell.selected)
    }

    pub(crate) fn category_mut(&mut self, key: &str) -> Option<&mut Category> {
        self.categories.get_mut(key)
    }

    /// Rebuilds `all_items`: letters first, then categories in display order.
    #[instrument(skip(self))]
    pub(crate) fn derive_items(&mut self) {
        let letters = self
            .mash_letters
            .iter()
            .enumerate()
            .map(|(index, cell)| Item {
                crossed: cell.crossed,
                ..Item::letter(index)
            });

        let options = self.category_order.iter().flat_map(|key| {
            self.categories.get(key).into_iter().flat_map(move |category| {
                (0..category.options.len()).map(move |index| Item {
                    crossed: category.is_crossed(index),
                    ..Item::option(key.clone(), index)
                })
            })
        });

        let items: Vec<Item> = letters.chain(options).collect();
        debug!(item_count = items.len(), "Derived elimination sequence");
        self.all_items = items;
    }

    /// Crosses out the item at `position` and its source cell.
    ///
    /// Returns false if the position is out of range or already crossed.
    #[instrument(skip(self))]
    pub(crate) fn cross(&mut self, position: usize) -> bool {
        let Some(item) = self.all_items.get_mut(position) else {
            warn!(position, "Cross requested outside elimination sequence");
            return false;
        };
        if item.crossed {
            return false;
        }
        item.crossed = true;
        let (kind, index) = (item.kind, item.index);
        let key = item.category_key.clone();

        match kind {
            ItemKind::Mash => {
                if let Some(cell) = self.mash_letters.get_mut(index) {
                    cell.crossed = true;
                }
            }
            ItemKind::Category => {
                if let Some(category) = key.as_deref().and_then(|k| self.categories.get_mut(k)) {
                    category.crossed_options.insert(index);
                }
            }
        }
        true
    }

    /// Moves to `next` if it is the phase directly after the current one.
    pub(crate) fn advance_phase(&mut self, next: Phase) -> bool {
        if !self.phase.can_advance_to(next) {
            warn!(from = %self.phase, to = %next, "Rejected phase regression");
            return false;
        }
        debug!(from = %self.phase, to = %next, "Phase advanced");
        self.phase = next;
        true
    }

    /// Clears elimination progress and returns to setup, keeping options.
    #[instrument(skip(self))]
    pub(crate) fn clear_elimination(&mut self) {
        for cell in &mut self.mash_letters {
            cell.crossed = false;
            cell.selected = false;
        }
        for category in self.categories.values_mut() {
            category.clear_elimination();
        }
        self.phase = Phase::Setup;
        self.selected_category = None;
        self.current_input.clear();
        self.animation_running = false;
        self.current_animation_index = 0;
        self.tally = 0;
        self.all_items.clear();
    }

    /// Resets to a blank setup state, keeping only the letters.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        let letters: String = self.mash_letters.iter().map(|cell| cell.letter).collect();
        *self = Self::new(&letters);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(crate::presets::DEFAULT_LETTERS)
    }
}
