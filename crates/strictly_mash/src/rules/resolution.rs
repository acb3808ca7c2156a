//! Group resolution: when a group is down to its survivor.

use super::super::{GameState, Item, ItemKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A set of items that resolves to a single survivor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    /// The letters of the title word.
    Letters,
    /// The options of one category.
    Category(String),
}

impl Group {
    /// The group an item belongs to.
    pub fn of(item: &Item) -> Self {
        match (item.kind(), item.category_key()) {
            (ItemKind::Category, Some(key)) => Group::Category(key.to_string()),
            _ => Group::Letters,
        }
    }

    /// Every group of a state: letters first, then categories in display order.
    pub fn all(state: &GameState) -> Vec<Group> {
        std::iter::once(Group::Letters)
            .chain(state.category_order().iter().cloned().map(Group::Category))
            .collect()
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Group::Letters => write!(f, "letters"),
            Group::Category(key) => write!(f, "{}", key),
        }
    }
}

/// Counts the uncrossed items of a group.
pub fn remaining(state: &GameState, group: &Group) -> usize {
    match group {
        Group::Letters => state.mash_letters().iter().filter(|c| !c.crossed()).count(),
        Group::Category(key) => state.category(key).map_or(0, |c| c.remaining()),
    }
}

/// True once a group has at most one uncrossed item.
pub fn is_resolved(state: &GameState, group: &Group) -> bool {
    remaining(state, group) <= 1
}

/// True once every group is resolved.
#[instrument(skip(state))]
pub fn is_complete(state: &GameState) -> bool {
    Group::all(state).iter().all(|g| is_resolved(state, g))
}

/// Index of the single uncrossed item of a resolved group.
pub fn survivor(state: &GameState, group: &Group) -> Option<usize> {
    if remaining(state, group) != 1 {
        return None;
    }
    match group {
        Group::Letters => state.mash_letters().iter().position(|c| !c.crossed()),
        Group::Category(key) => {
            let category = state.category(key)?;
            (0..category.options().len()).find(|i| !category.is_crossed(*i))
        }
    }
}

/// Writes the selection of every group that just reached one survivor.
///
/// Selections are written once; groups already selected are left alone.
/// Returns the newly resolved groups.
#[instrument(skip(state))]
pub(crate) fn resolve_groups(state: &mut GameState) -> Vec<Group> {
    let mut resolved = Vec::new();

    for group in Group::all(state) {
        let Some(index) = survivor(state, &group) else {
            continue;
        };
        match &group {
            Group::Letters => {
                if state.mash_letters.iter().any(|c| c.selected) {
                    continue;
                }
                state.mash_letters[index].selected = true;
            }
            Group::Category(key) => {
                let Some(category) = state.category_mut(key) else {
                    continue;
                };
                if category.selected_index.is_some() {
                    continue;
                }
                category.selected_index = Some(index);
            }
        }
        debug!(%group, index, "Group resolved");
        resolved.push(group);
    }

    resolved
}
