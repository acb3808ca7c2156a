//! Headless elimination: steps a configured game to its results.

use strictly_mash::{
    GameResults, GameSetup, GameState, Group, Item, PlayError, PlayTransition, StepEvent,
};
use tracing::{debug, info, instrument};

/// One crossing seen during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crossing {
    /// Steps taken when the item was crossed.
    pub step: usize,
    /// Label of the crossed item.
    pub label: String,
    /// Groups left with one survivor by this crossing.
    pub resolved: Vec<Group>,
}

impl std::fmt::Display for Crossing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {:>3}: crossed {}", self.step, self.label)?;
        for group in &self.resolved {
            write!(f, " ({} resolved)", group)?;
        }
        Ok(())
    }
}

/// Results of a headless run.
#[derive(Debug)]
pub struct Outcome {
    /// The finished game.
    pub results: GameResults,
    /// Every crossing in order.
    pub crossings: Vec<Crossing>,
    /// Total steps taken.
    pub steps: usize,
}

fn label(game_state: &GameState, item: usize) -> String {
    game_state
        .all_items()
        .get(item)
        .and_then(|it: &Item| game_state.item_label(it))
        .unwrap_or_else(|| format!("#{}", item))
}

fn record(crossings: &mut Vec<Crossing>, step: usize, state: &GameState, event: StepEvent) {
    if let StepEvent::Crossed { item, resolved } = event {
        let crossing = Crossing {
            step,
            label: label(state, item),
            resolved,
        };
        debug!(%crossing, "Crossing");
        crossings.push(crossing);
    }
}

/// Starts the game and steps until every group has a survivor.
#[instrument(skip(setup), fields(magic_number = setup.state().magic_number()))]
pub fn run_headless(setup: GameSetup) -> anyhow::Result<Outcome> {
    let mut game = setup.start()?;
    let limit = step_limit(game.state());
    let mut crossings = Vec::new();
    let mut steps = 0;

    loop {
        match game.step()? {
            PlayTransition::Playing { game: next, event } => {
                steps += 1;
                record(&mut crossings, steps, next.state(), event);
                game = next;
            }
            PlayTransition::Finished { results, event } => {
                if let Some(event) = event {
                    steps += 1;
                    record(&mut crossings, steps, results.state(), event);
                }
                info!(steps, crossings = crossings.len(), "Run finished");
                return Ok(Outcome {
                    results,
                    crossings,
                    steps,
                });
            }
        }

        if steps > limit {
            return Err(PlayError::InvariantViolation("elimination did not converge".to_string()).into());
        }
    }
}

// Each crossing visits at most every item once and there are fewer
// crossings than items.
fn step_limit(state: &GameState) -> usize {
    let items = state.all_items().len().max(1);
    items.saturating_mul(items)
}
