//! Core library for the dettato dictation drill.
//!
//! Provides:
//! - Position-relative SM-2 scheduler driven by a logical clock
//! - Keystroke grading with diacritic equivalence and random masking
//! - Session controller (due-card selection, clock, grading)
//! - Deck loading from JSON and markdown

pub mod deck;
pub mod diacritics;
pub mod error;
pub mod mask;
pub mod parser;
pub mod scheduler;
pub mod selection;
pub mod session;
mod timsort;
pub mod types;
pub mod typing;

pub use deck::Deck;
pub use diacritics::DiacriticTable;
pub use error::{DeckError, DiacriticError, Result};
pub use mask::{MaskSource, RngMask, SequenceMask};
pub use scheduler::schedule;
pub use selection::{select_active_card, UpcomingEntry};
pub use session::{GradedCard, Phase, Session};
pub use types::{CardId, CardRecord, Cell, CellStyle, Flashcard, SchedulingState, SelectionPolicy};
pub use typing::{on_input_change, InputChange, InputOutcome};
