//! Core types for the dictation drill.

use crate::scheduler::INITIAL_EASE;
use serde::{Deserialize, Serialize};

/// Stable card identifier: the card's position in its source sequence.
pub type CardId = usize;

/// Spaced repetition state of a card.
///
/// `interval` is a value of the session's logical clock, not a duration:
/// the card is due once the clock reaches it. Zero means never scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SchedulingState {
    pub interval: i64,
    pub repetition: u32,
    pub efactor: f64,
}

impl Default for SchedulingState {
    fn default() -> Self {
        Self {
            interval: 0,
            repetition: 0,
            efactor: INITIAL_EASE,
        }
    }
}

impl SchedulingState {
    /// Whether the card has never been scheduled.
    pub fn is_unscheduled(&self) -> bool {
        self.interval == 0
    }

    /// Whether the card is due at the given clock value.
    pub fn is_due(&self, level: i64) -> bool {
        self.interval <= level
    }
}

/// Question/answer pair read from a deck source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardRecord {
    pub question: String,
    pub answer: String,
}

impl CardRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Card with assigned ID and scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flashcard {
    pub id: CardId,
    pub question: String,
    pub answer: String,
    #[serde(flatten)]
    pub state: SchedulingState,
}

/// Display style of a character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStyle {
    New,
    Correct,
    Incorrect,
    Blank,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::New
    }
}

/// One character of the active card's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub content: char,
    pub style: CellStyle,
    pub hidden: bool,
}

impl Cell {
    /// Placeholder shown instead of a masked character.
    pub const MASK: char = '_';

    /// Character to display: the mask while hidden, the content otherwise.
    pub fn display(&self) -> char {
        if self.hidden {
            Self::MASK
        } else {
            self.content
        }
    }
}

/// How due cards are ordered when picking the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Earliest-due comparator that treats unscheduled cards as never
    /// sorting first, applied with the browser's run-merging sort.
    Compatible,
    /// Scheduled cards ascending by interval, unscheduled cards after them
    /// in deck order.
    Ascending,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::Compatible
    }
}

impl SelectionPolicy {
    /// Get the policy name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compatible => "compatible",
            Self::Ascending => "ascending",
        }
    }

    /// Parse from string.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "compatible" => Some(Self::Compatible),
            "ascending" => Some(Self::Ascending),
            _ => None,
        }
    }
}
