//! HTTP endpoint handlers. These are thin wrappers that forward to the generator.

use std::sync::Arc;

use axum::{extract::{Query, State}, response::IntoResponse, Json};
use tracing::{info, instrument};

use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let model = state.generator.model_name().map(str::to_string);
  Json(HealthOut { ok: true, model })
}

#[instrument(level = "info", skip(state, q))]
pub async fn http_get_challenge(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ChallengeQuery>,
) -> impl IntoResponse {
  let difficulty = q
    .difficulty
    .filter(|d| !d.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_DIFFICULTY.into());
  let outcome = state.generator.generate(&difficulty).await;
  let out = to_out(&difficulty, outcome);
  info!(target: "challenge", %difficulty, id = %out.id, origin = %out.origin, "HTTP challenge served");
  Json(out)
}
