//! JSON Schema of the stored game state.

use super::GameState;
use tracing::instrument;

/// Returns the JSON Schema describing a serialized [`GameState`].
#[instrument]
pub fn state_schema() -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(schemars::schema_for!(GameState))
}
