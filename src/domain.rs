//! Domain models: the multiple-choice challenge and the outcome of generating one.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Keys every generated challenge must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["title", "options", "correct_answer_id", "explanation"];

/// A multiple-choice coding question.
///
/// The title holds both the question prose and the code snippet it asks about.
/// `options` is expected to hold four entries and `correct_answer_id` to index
/// into it; neither is enforced here.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Challenge {
  pub title: String,
  pub options: Vec<String>,
  pub correct_answer_id: usize,
  pub explanation: String,
}

impl Challenge {
  /// The option marked as correct, if the index is in range.
  pub fn correct_option(&self) -> Option<&str> {
    self.options.get(self.correct_answer_id).map(String::as_str)
  }
}

/// What a generation attempt produced.
///
/// Both variants carry a usable challenge; `Fallback` additionally keeps the
/// error that forced the default record.
#[derive(Debug)]
pub enum GenerationOutcome {
  Generated(Challenge),
  Fallback { challenge: Challenge, error: GenerationError },
}

impl GenerationOutcome {
  pub fn challenge(&self) -> &Challenge {
    match self {
      GenerationOutcome::Generated(c) => c,
      GenerationOutcome::Fallback { challenge, .. } => challenge,
    }
  }

  pub fn into_challenge(self) -> Challenge {
    match self {
      GenerationOutcome::Generated(c) => c,
      GenerationOutcome::Fallback { challenge, .. } => challenge,
    }
  }

  pub fn is_fallback(&self) -> bool {
    matches!(self, GenerationOutcome::Fallback { .. })
  }

  /// Short label used in logs and HTTP responses.
  pub fn origin(&self) -> &'static str {
    match self {
      GenerationOutcome::Generated(_) => "generated",
      GenerationOutcome::Fallback { .. } => "fallback",
    }
  }

  pub fn error(&self) -> Option<&GenerationError> {
    match self {
      GenerationOutcome::Generated(_) => None,
      GenerationOutcome::Fallback { error, .. } => Some(error),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> Challenge {
    Challenge {
      title: "T".into(),
      options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
      correct_answer_id: 2,
      explanation: "E".into(),
    }
  }

  #[test]
  fn serializes_exactly_the_four_keys() {
    let v = serde_json::to_value(sample()).unwrap();
    let obj = v.as_object().unwrap();
    assert_eq!(obj.len(), 4);
    for key in REQUIRED_FIELDS {
      assert!(obj.contains_key(key), "missing {key}");
    }
    assert_eq!(v["correct_answer_id"], 2);
  }

  #[test]
  fn correct_option_is_bounds_checked() {
    let mut c = sample();
    assert_eq!(c.correct_option(), Some("c"));
    c.correct_answer_id = 7;
    assert_eq!(c.correct_option(), None);
  }

  #[test]
  fn outcome_reports_origin() {
    let generated = GenerationOutcome::Generated(sample());
    assert!(!generated.is_fallback());
    assert_eq!(generated.origin(), "generated");
    assert!(generated.error().is_none());

    let fallback = GenerationOutcome::Fallback {
      challenge: sample(),
      error: GenerationError::MissingField("explanation"),
    };
    assert!(fallback.is_fallback());
    assert_eq!(fallback.origin(), "fallback");
    assert_eq!(fallback.into_challenge(), sample());
  }
}
