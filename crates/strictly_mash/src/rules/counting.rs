//! Counting through the elimination sequence.
//!
//! Positions are absolute: the walk repeats `all_items` forever, so
//! position `p` is item `p % all_items.len()`.

use super::super::{GameState, Item};
use super::resolution::{Group, is_resolved};
use tracing::instrument;

/// True if the count visits this item: uncrossed, and its group is still open.
pub fn is_eligible(state: &GameState, item: &Item) -> bool {
    !item.crossed() && !is_resolved(state, &Group::of(item))
}

/// Finds the first eligible absolute position at or after `from`.
///
/// Returns `None` when nothing is left to count.
#[instrument(skip(state))]
pub fn next_eligible(state: &GameState, from: usize) -> Option<usize> {
    let items = state.all_items();
    let len = items.len();
    if len == 0 {
        return None;
    }
    (from..from + len).find(|&position| is_eligible(state, &items[position % len]))
}

/// Counts the items the count still visits.
pub fn eligible_count(state: &GameState) -> usize {
    state
        .all_items()
        .iter()
        .filter(|item| is_eligible(state, item))
        .count()
}

/// Visits still needed before the count crosses an item.
///
/// The eligible items only change on a crossing, so every full lap over
/// them lands back on the same item. Laps are dropped: the result is in
/// `1..=eligible_count`, whatever the magic number.
pub fn visits_needed(state: &GameState) -> u32 {
    let remaining = state.magic_number().saturating_sub(state.tally()).max(1);
    let eligible = u32::try_from(eligible_count(state)).unwrap_or(u32::MAX);
    if eligible == 0 {
        return remaining;
    }
    (remaining - 1) % eligible + 1
}

/// Absolute position of the item the count will cross next.
///
/// Walks the visits still needed to reach the magic number from the
/// current cursor and tally. Returns `None` if the elimination is over or
/// no magic number is set.
#[instrument(skip(state))]
pub fn next_crossing(state: &GameState) -> Option<usize> {
    if state.magic_number() == 0 {
        return None;
    }

    let mut position = state.current_animation_index();
    let mut landed = None;
    for _ in 0..visits_needed(state) {
        let found = next_eligible(state, position)?;
        landed = Some(found);
        position = found + 1;
    }
    landed
}
