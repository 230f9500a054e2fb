//! Challenge generation: prompt the model, clean and parse its reply, and fall
//! back to the built-in record on any failure.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::domain::{Challenge, GenerationOutcome, REQUIRED_FIELDS};
use crate::error::GenerationError;
use crate::seeds::fallback_challenge;
use crate::util::{clean_title, fill_template, trunc_for_log};

/// A text-in, text-out generative model.
#[async_trait]
pub trait TextModel: Send + Sync {
  async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError>;

  /// Model identifier, for logs.
  fn name(&self) -> &str;
}

#[derive(Clone)]
pub struct ChallengeGenerator {
  model: Option<Arc<dyn TextModel>>,
  prompts: Prompts,
}

impl ChallengeGenerator {
  pub fn new(model: Arc<dyn TextModel>, prompts: Prompts) -> Self {
    Self { model: Some(model), prompts }
  }

  /// A generator with no model behind it; every call yields the fallback.
  pub fn offline(prompts: Prompts) -> Self {
    Self { model: None, prompts }
  }

  pub fn model_name(&self) -> Option<&str> {
    self.model.as_deref().map(|m| m.name())
  }

  /// Prompt sent to the model for `difficulty`.
  pub fn prompt_for(&self, difficulty: &str) -> String {
    fill_template(&self.prompts.challenge_template, &[("difficulty", difficulty)])
  }

  /// Never fails: a generated challenge, or the fallback record.
  ///
  /// Entry point for library callers that only want the record; use
  /// [`ChallengeGenerator::generate`] to learn whether the fallback was served.
  pub async fn generate_challenge(&self, difficulty: &str) -> Challenge {
    self.generate(difficulty).await.into_challenge()
  }

  /// Generate a challenge, recording whether the fallback had to be used.
  #[instrument(level = "info", skip(self), fields(%difficulty, model = self.model_name().unwrap_or("none")))]
  pub async fn generate(&self, difficulty: &str) -> GenerationOutcome {
    let start = Instant::now();
    match self.try_generate(difficulty).await {
      Ok(challenge) => {
        info!(
          target: "challenge",
          elapsed = ?start.elapsed(),
          title_preview = %trunc_for_log(&challenge.title, 60),
          options = challenge.options.len(),
          "Challenge generated"
        );
        GenerationOutcome::Generated(challenge)
      }
      Err(e) => {
        error!(target: "challenge", elapsed = ?start.elapsed(), class = %e.class(), error = %e, "Challenge generation failed; serving fallback");
        GenerationOutcome::Fallback { challenge: fallback_challenge(), error: e }
      }
    }
  }

  /// One model call and parse, without the fallback.
  pub async fn try_generate(&self, difficulty: &str) -> Result<Challenge, GenerationError> {
    let model = self.model.as_ref().ok_or(GenerationError::ModelUnavailable)?;
    let prompt = self.prompt_for(difficulty);
    let raw = model.generate_text(&prompt).await?;
    parse_challenge(&raw)
  }
}

/// Turn a raw model reply into a challenge.
///
/// Strips code fences, parses JSON, checks that every required key is present,
/// then cleans the title with the same fence stripping.
pub fn parse_challenge(raw: &str) -> Result<Challenge, GenerationError> {
  let cleaned = clean_title(raw);
  let value: Value = serde_json::from_str(&cleaned).map_err(GenerationError::InvalidJson)?;
  let obj = value.as_object().ok_or(GenerationError::NotAnObject)?;

  if let Some(missing) = REQUIRED_FIELDS.iter().find(|k| !obj.contains_key(**k)) {
    return Err(GenerationError::MissingField(*missing));
  }

  let mut challenge: Challenge = serde_json::from_value(value).map_err(GenerationError::InvalidShape)?;
  challenge.title = clean_title(&challenge.title);
  Ok(challenge)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Mutex;

  /// Returns a canned reply and remembers the prompts it saw.
  struct StubModel {
    reply: Result<String, u16>,
    prompts: Mutex<Vec<String>>,
  }

  impl StubModel {
    fn text(reply: &str) -> Arc<Self> {
      Arc::new(Self { reply: Ok(reply.to_string()), prompts: Mutex::new(Vec::new()) })
    }

    fn http_error(status: u16) -> Arc<Self> {
      Arc::new(Self { reply: Err(status), prompts: Mutex::new(Vec::new()) })
    }
  }

  #[async_trait]
  impl TextModel for StubModel {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
      self.prompts.lock().unwrap().push(prompt.to_string());
      match &self.reply {
        Ok(text) => Ok(text.clone()),
        Err(status) => Err(GenerationError::Http { status: *status, message: "stub failure".into() }),
      }
    }

    fn name(&self) -> &str {
      "stub"
    }
  }

  fn generator(model: Arc<StubModel>) -> ChallengeGenerator {
    ChallengeGenerator::new(model, Prompts::default())
  }

  const FENCED: &str = "```json\n{\"title\":\"T\",\"options\":[\"a\",\"b\",\"c\",\"d\"],\"correct_answer_id\":2,\"explanation\":\"E\"}\n```";

  #[tokio::test]
  async fn parses_fenced_json_reply() {
    let outcome = generator(StubModel::text(FENCED)).generate("easy").await;
    assert!(!outcome.is_fallback());
    assert_eq!(
      outcome.into_challenge(),
      Challenge {
        title: "T".into(),
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct_answer_id: 2,
        explanation: "E".into(),
      }
    );
  }

  #[tokio::test]
  async fn cleans_fenced_title() {
    let reply = r#"{"title":"```python\nWhat does len([1, 2]) return?\n```","options":["1","2","3","4"],"correct_answer_id":1,"explanation":"Two items."}"#;
    let c = generator(StubModel::text(reply)).generate_challenge("easy").await;
    assert_eq!(c.title, "What does len([1, 2]) return?");
    assert_eq!(c.correct_option(), Some("2"));
  }

  #[tokio::test]
  async fn missing_field_falls_back() {
    let reply = r#"{"title":"T","options":["a","b","c","d"],"correct_answer_id":2}"#;
    let outcome = generator(StubModel::text(reply)).generate("medium").await;
    assert!(outcome.is_fallback());
    assert!(matches!(outcome.error(), Some(GenerationError::MissingField("explanation"))));
    assert_eq!(outcome.into_challenge(), fallback_challenge());
  }

  #[tokio::test]
  async fn non_json_falls_back() {
    let outcome = generator(StubModel::text("Sure! Here is a question about lists.")).generate("hard").await;
    assert!(matches!(outcome.error(), Some(GenerationError::InvalidJson(_))));
    assert_eq!(outcome.challenge(), &fallback_challenge());
  }

  #[tokio::test]
  async fn service_error_falls_back() {
    let outcome = generator(StubModel::http_error(503)).generate("easy").await;
    assert!(matches!(outcome.error(), Some(GenerationError::Http { status: 503, .. })));
    assert_eq!(outcome.into_challenge(), fallback_challenge());
  }

  #[tokio::test]
  async fn offline_generator_always_falls_back() {
    let g = ChallengeGenerator::offline(Prompts::default());
    assert_eq!(g.model_name(), None);
    let outcome = g.generate("easy").await;
    assert!(matches!(outcome.error(), Some(GenerationError::ModelUnavailable)));
    assert_eq!(g.generate_challenge("anything").await, fallback_challenge());
  }

  #[tokio::test]
  async fn difficulty_reaches_the_prompt() {
    let model = StubModel::text(FENCED);
    let g = generator(model.clone());
    g.generate("hard").await;
    let seen = model.prompts.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("difficulty level: hard."));
    assert!(!seen[0].contains("{difficulty}"));
  }

  #[test]
  fn parse_rejects_wrong_types_and_non_objects() {
    assert!(matches!(parse_challenge("[1, 2, 3]"), Err(GenerationError::NotAnObject)));
    let wrong = r#"{"title":"T","options":"a,b,c,d","correct_answer_id":0,"explanation":"E"}"#;
    assert!(matches!(parse_challenge(wrong), Err(GenerationError::InvalidShape(_))));
    let negative = r#"{"title":"T","options":["a","b","c","d"],"correct_answer_id":-1,"explanation":"E"}"#;
    assert!(matches!(parse_challenge(negative), Err(GenerationError::InvalidShape(_))));
  }

  #[test]
  fn parse_reports_first_missing_field() {
    assert!(matches!(parse_challenge("{}"), Err(GenerationError::MissingField("title"))));
    let no_options = r#"{"title":"T","correct_answer_id":0,"explanation":"E"}"#;
    assert!(matches!(parse_challenge(no_options), Err(GenerationError::MissingField("options"))));
  }

  #[test]
  fn parse_keeps_prose_title_behind_fence() {
    let reply = r#"{"title":"```What is len([1])?```","options":["0","1","2","3"],"correct_answer_id":1,"explanation":"One item."}"#;
    assert_eq!(parse_challenge(reply).unwrap().title, "What is len([1])?");
  }

  #[test]
  fn parse_ignores_extra_keys() {
    let extra = r#"{"title":"T","options":["a","b","c","d"],"correct_answer_id":3,"explanation":"E","difficulty":"easy"}"#;
    let c = parse_challenge(extra).unwrap();
    assert_eq!(c.correct_answer_id, 3);
    assert_eq!(serde_json::to_value(&c).unwrap().as_object().unwrap().len(), 4);
  }
}
