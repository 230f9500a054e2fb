//! Errors raised while generating a challenge.
//!
//! Every variant is recoverable from the caller's point of view: the generator
//! logs it and serves the fallback record instead.

use thiserror::Error;

/// Broad class of a generation failure, used as a structured log field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
  /// The model could not be reached or answered with an error.
  Transport,
  /// The model answered, but not with a JSON object.
  Format,
  /// The JSON object does not have the challenge shape.
  Schema,
}

impl ErrorClass {
  pub fn as_str(&self) -> &'static str {
    match self {
      ErrorClass::Transport => "transport",
      ErrorClass::Format => "format",
      ErrorClass::Schema => "schema",
    }
  }
}

impl std::fmt::Display for ErrorClass {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("no model configured (GOOGLE_API_KEY not set)")]
  ModelUnavailable,

  #[error("model request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("model HTTP {status}: {message}")]
  Http { status: u16, message: String },

  #[error("model returned no text")]
  EmptyResponse,

  #[error("response is not valid JSON: {0}")]
  InvalidJson(#[source] serde_json::Error),

  #[error("response JSON is not an object")]
  NotAnObject,

  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("response does not match the challenge shape: {0}")]
  InvalidShape(#[source] serde_json::Error),
}

impl GenerationError {
  pub fn class(&self) -> ErrorClass {
    match self {
      GenerationError::ModelUnavailable
      | GenerationError::Request(_)
      | GenerationError::Http { .. }
      | GenerationError::EmptyResponse => ErrorClass::Transport,
      GenerationError::InvalidJson(_) | GenerationError::NotAnObject => ErrorClass::Format,
      GenerationError::MissingField(_) | GenerationError::InvalidShape(_) => ErrorClass::Schema,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classes_follow_the_failure_point() {
    assert_eq!(GenerationError::ModelUnavailable.class(), ErrorClass::Transport);
    assert_eq!(
      GenerationError::Http { status: 503, message: "overloaded".into() }.class(),
      ErrorClass::Transport
    );
    let bad = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    assert_eq!(GenerationError::InvalidJson(bad).class(), ErrorClass::Format);
    assert_eq!(GenerationError::MissingField("title").class(), ErrorClass::Schema);
  }

  #[test]
  fn messages_name_the_problem() {
    assert_eq!(
      GenerationError::MissingField("explanation").to_string(),
      "missing required field: explanation"
    );
    assert_eq!(
      GenerationError::Http { status: 429, message: "quota".into() }.to_string(),
      "model HTTP 429: quota"
    );
  }
}
