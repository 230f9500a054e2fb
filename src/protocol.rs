//! HTTP payloads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Challenge, GenerationOutcome};

pub const DEFAULT_DIFFICULTY: &str = "easy";

#[derive(Debug, Deserialize)]
pub struct ChallengeQuery {
  #[serde(default)]
  pub difficulty: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeOut {
  pub id: String,
  pub difficulty: String,
  /// "generated" or "fallback".
  pub origin: String,
  pub challenge: Challenge,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthOut {
  pub ok: bool,
  pub model: Option<String>,
}

pub fn to_out(difficulty: &str, outcome: GenerationOutcome) -> ChallengeOut {
  ChallengeOut {
    id: Uuid::new_v4().to_string(),
    difficulty: difficulty.to_string(),
    origin: outcome.origin().to_string(),
    challenge: outcome.into_challenge(),
  }
}
