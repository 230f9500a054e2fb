//! Application state: the challenge generator built once at startup.
//!
//! The model client and credential are constructed here and handed to the
//! generator explicitly; nothing else is shared between requests.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::{load_app_config_from_env, ModelSettings};
use crate::gemini::Gemini;
use crate::generator::ChallengeGenerator;

#[derive(Clone)]
pub struct AppState {
    pub generator: ChallengeGenerator,
}

impl AppState {
    pub fn new(generator: ChallengeGenerator) -> Self {
        Self { generator }
    }

    /// Build state from env: load TOML config, resolve model settings, init Gemini.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Self {
        let cfg = load_app_config_from_env().unwrap_or_default();
        let settings = ModelSettings::resolve(&cfg.model);

        let generator = match Gemini::from_settings(&settings) {
            Some(gemini) => {
                info!(target: "codequiz_backend", base_url = %gemini.base_url, model = %gemini.model, timeout = ?settings.timeout, "Gemini enabled.");
                ChallengeGenerator::new(Arc::new(gemini), cfg.prompts)
            }
            None => {
                warn!(target: "codequiz_backend", "Gemini disabled (no GOOGLE_API_KEY). Every challenge will be the fallback.");
                ChallengeGenerator::offline(cfg.prompts)
            }
        };

        Self::new(generator)
    }
}
