//! Built-in default content.

use crate::domain::Challenge;

/// The record served whenever generation or parsing fails.
pub fn fallback_challenge() -> Challenge {
  Challenge {
    title: "Basic Python List Operation".into(),
    options: vec![
      "my_list.append(5)".into(),
      "my_list.add(5)".into(),
      "my_list.push(5)".into(),
      "my_list.insert(5)".into(),
    ],
    correct_answer_id: 0,
    explanation: "In Python, append() is the correct method to add an element to the end of a list.".into(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fallback_is_well_formed() {
    let c = fallback_challenge();
    assert_eq!(c.options.len(), 4);
    assert_eq!(c.correct_option(), Some("my_list.append(5)"));
  }
}
