//! Minimal Gemini client for our use-case.
//!
//! We only call `models/{model}:generateContent` with a single text prompt and
//! read back the first candidate's text. Calls are instrumented and log the
//! model name, latency and response size (not contents).
//!
//! NOTE: the API key travels in the `x-goog-api-key` header and is never logged.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::ModelSettings;
use crate::error::GenerationError;
use crate::generator::TextModel;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct Gemini {
  pub client: reqwest::Client,
  api_key: String,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
}

impl Gemini {
  /// Construct the client if the settings carry an API key; otherwise return None.
  pub fn from_settings(settings: &ModelSettings) -> Option<Self> {
    let api_key = settings.api_key.clone()?;
    let client = reqwest::Client::builder()
      .timeout(settings.timeout)
      .build()
      .ok()?;

    Some(Self {
      client,
      api_key,
      base_url: settings.base_url.clone(),
      model: settings.model.clone(),
      temperature: settings.temperature,
    })
  }

  fn endpoint(&self) -> String {
    format!("{}/models/{}:generateContent", self.base_url, self.model)
  }

  /// Single-prompt completion returning the raw text blob.
  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError> {
    let req = GenerateContentRequest::single_prompt(prompt, self.temperature);
    let start = Instant::now();

    let res = self.client.post(self.endpoint())
      .header(USER_AGENT, "codequiz-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(API_KEY_HEADER, &self.api_key)
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_gemini_error(&body).unwrap_or(body);
      return Err(GenerationError::Http { status: status.as_u16(), message });
    }

    let body: GenerateContentResponse = res.json().await?;
    if let Some(usage) = &body.usage_metadata {
      info!(prompt_tokens = ?usage.prompt_token_count, completion_tokens = ?usage.candidates_token_count, total_tokens = ?usage.total_token_count, "Gemini usage");
    }

    let text = body.text().ok_or(GenerationError::EmptyResponse)?;
    info!(elapsed = ?start.elapsed(), response_len = text.len(), "Gemini response received");
    Ok(text)
  }
}

#[async_trait]
impl TextModel for Gemini {
  async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
    self.generate_content(prompt).await
  }

  fn name(&self) -> &str {
    &self.model
  }
}

// --- generateContent DTOs ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
  contents: Vec<Content>,
  generation_config: GenerationConfig,
}

impl GenerateContentRequest {
  fn single_prompt(prompt: &str, temperature: f32) -> Self {
    Self {
      contents: vec![Content {
        role: Some("user".into()),
        parts: vec![Part { text: Some(prompt.into()) }],
      }],
      generation_config: GenerationConfig {
        temperature,
        response_mime_type: "application/json".into(),
      },
    }
  }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  temperature: f32,
  response_mime_type: String,
}

#[derive(Serialize, Deserialize)]
struct Content {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  role: Option<String>,
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)] candidates: Vec<Candidate>,
  #[serde(default)] usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
  /// Concatenated text parts of the first candidate; None if there is no text.
  fn text(&self) -> Option<String> {
    let content = self.candidates.first()?.content.as_ref()?;
    let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
    if text.trim().is_empty() { None } else { Some(text) }
  }
}

#[derive(Deserialize)]
struct Candidate { #[serde(default)] content: Option<Content> }

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  #[serde(default)] prompt_token_count: Option<u32>,
  #[serde(default)] candidates_token_count: Option<u32>,
  #[serde(default)] total_token_count: Option<u32>,
}

/// Try to extract a clean error message from a Gemini error body.
fn extract_gemini_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
