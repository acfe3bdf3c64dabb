//! Test fixtures for integration tests.

use dettato_core::CardRecord;
use serde_json::{json, Value};

/// Two short cards, answered "uno" and "due".
pub fn numbers() -> Vec<CardRecord> {
    vec![CardRecord::new("one", "uno"), CardRecord::new("two", "due")]
}

/// A card whose answer opens with an accented letter and contains a space.
pub fn accented() -> Vec<CardRecord> {
    vec![CardRecord::new("It's true.", "è vero")]
}

/// Body for POST /api/session/input.
pub fn input(value: &str) -> Value {
    json!({ "input": value })
}

/// Every prefix of `answer`, shortest first: the values a text field holds
/// while the answer is typed one key at a time.
pub fn keystrokes(answer: &str) -> Vec<String> {
    answer
        .char_indices()
        .map(|(idx, c)| answer[..idx + c.len_utf8()].to_string())
        .collect()
}
