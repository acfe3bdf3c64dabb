//! Error types for dettato-core.

use thiserror::Error;

/// Result type alias using DeckError.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Errors that can occur while loading a deck.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("invalid deck JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing question at line {line}")]
    MissingQuestion { line: usize },

    #[error("missing answer at line {line}")]
    MissingAnswer { line: usize },

    #[error("card {index} has an empty answer")]
    EmptyAnswer { index: usize },

    #[error("deck has no cards")]
    Empty,
}

/// Errors that can occur while loading a diacritic-equivalence table.
#[derive(Debug, Error)]
pub enum DiacriticError {
    #[error("invalid diacritics JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("diacritic entry {key:?} -> {value:?} must map one character to one character")]
    NotSingleChar { key: String, value: String },
}
