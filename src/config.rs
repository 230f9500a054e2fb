//! Loading generator configuration (prompt + model settings) from TOML and env.
//!
//! Env variables win over the TOML file for model settings; the prompt can only
//! be overridden from TOML. See `AppConfig` for the expected schema.

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite-preview-06-17";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TEMPERATURE: f32 = 0.9;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub model: ModelCfg,
}

/// Optional model overrides accepted in TOML.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct ModelCfg {
  #[serde(default)] pub name: Option<String>,
  #[serde(default)] pub base_url: Option<String>,
  #[serde(default)] pub temperature: Option<f32>,
  #[serde(default)] pub timeout_secs: Option<u64>,
}

/// Prompt sent to the model. `{difficulty}` is replaced per request.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  pub challenge_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self { challenge_template: DEFAULT_CHALLENGE_TEMPLATE.into() }
  }
}

const DEFAULT_CHALLENGE_TEMPLATE: &str = r#"You are an expert coding challenge creator.
Your task is to generate a coding question with multiple choice answers.
The question must match this difficulty level: {difficulty}.

For easy questions: Focus on basic syntax, simple operations, or common programming concepts.
For medium questions: Cover intermediate concepts like data structures, algorithms, or language features.
For hard questions: Include advanced topics, design patterns, optimization techniques, or complex algorithms.

Return the challenge in the following JSON format:
{
  "title": "The question title",
  "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
  "correct_answer_id": 0,
  "explanation": "Detailed explanation of why the correct answer is right"
}

Only return valid JSON. Do not include markdown, code fences, or commentary.
In "title" there should be both the question and the code of the question.

Make sure the options are plausible but with only one clearly correct answer.

It should look like this. Don't add formatting words like python or ```, neither in the options nor in the title:
{
  "title": "Basic Python List Operation",
  "options": [
    "my_list.append(5)",
    "my_list.add(5)",
    "my_list.push(5)",
    "my_list.insert(5)"
  ],
  "correct_answer_id": 0,
  "explanation": "In Python, append() is the correct method to add an element to the end of a list."
}
"#;

/// Resolved settings for the Gemini client.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelSettings {
  pub api_key: Option<String>,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
  pub timeout: Duration,
}

impl ModelSettings {
  /// Merge env (`GOOGLE_API_KEY`, `GEMINI_*`) over TOML overrides over defaults.
  pub fn resolve(cfg: &ModelCfg) -> Self {
    Self::resolve_with(cfg, |k| std::env::var(k).ok())
  }

  fn resolve_with(cfg: &ModelCfg, env: impl Fn(&str) -> Option<String>) -> Self {
    let api_key = env("GOOGLE_API_KEY").filter(|k| !k.trim().is_empty());
    let base_url = env("GEMINI_BASE_URL")
      .or_else(|| cfg.base_url.clone())
      .unwrap_or_else(|| DEFAULT_BASE_URL.into())
      .trim_end_matches('/')
      .to_string();
    let model = env("GEMINI_MODEL")
      .or_else(|| cfg.name.clone())
      .unwrap_or_else(|| DEFAULT_MODEL.into());
    let timeout_secs = match env("GEMINI_TIMEOUT_SECS").map(|s| s.parse::<u64>()) {
      Some(Ok(secs)) => Some(secs),
      Some(Err(e)) => {
        warn!(target: "codequiz_backend", error = %e, "Ignoring invalid GEMINI_TIMEOUT_SECS");
        None
      }
      None => None,
    };
    let timeout = Duration::from_secs(timeout_secs.or(cfg.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS));
    let temperature = cfg.temperature.unwrap_or(DEFAULT_TEMPERATURE);

    Self { api_key, base_url, model, temperature, timeout }
  }
}

/// Attempt to load `AppConfig` from CHALLENGE_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_app_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("CHALLENGE_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "codequiz_backend", %path, "Loaded generator config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "codequiz_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "codequiz_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
