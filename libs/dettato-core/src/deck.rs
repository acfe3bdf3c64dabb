//! Deck of flashcards indexed by stable id.

use crate::error::{DeckError, Result};
use crate::parser;
use crate::types::{CardId, CardRecord, Flashcard, SchedulingState};

/// Built-in sample deck.
pub const SAMPLE_DECK: &str = include_str!("../data/flashcards.json");

/// Fixed set of cards for a session. Card ids are positions in the source
/// sequence, so lookups and write-backs go straight to the slot.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Flashcard>,
}

impl Deck {
    /// Assign ids and initial scheduling state to `records`.
    pub fn from_records(records: impl IntoIterator<Item = CardRecord>) -> Self {
        let cards = records
            .into_iter()
            .enumerate()
            .map(|(id, record)| Flashcard {
                id,
                question: record.question,
                answer: record.answer,
                state: SchedulingState::default(),
            })
            .collect();
        Self { cards }
    }

    /// Load a JSON array of `{ "question", "answer" }` objects.
    pub fn from_json(content: &str) -> Result<Self> {
        let records: Vec<CardRecord> = serde_json::from_str(content)?;
        validate(&records)?;
        Ok(Self::from_records(records))
    }

    /// Load a markdown deck (see [`parser`]).
    pub fn from_markdown(content: &str) -> Result<Self> {
        let records = parser::parse(content)?;
        validate(&records)?;
        Ok(Self::from_records(records))
    }

    /// The built-in sample deck.
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_DECK)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: CardId) -> Option<&Flashcard> {
        self.cards.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flashcard> {
        self.cards.iter()
    }

    /// Write a new scheduling state back onto card `id`.
    /// Returns false if the id is unknown.
    pub fn set_state(&mut self, id: CardId, state: SchedulingState) -> bool {
        match self.cards.get_mut(id) {
            Some(card) => {
                card.state = state;
                true
            }
            None => false,
        }
    }
}

fn validate(records: &[CardRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(DeckError::Empty);
    }
    match records.iter().position(|r| r.answer.trim().is_empty()) {
        Some(index) => Err(DeckError::EmptyAnswer { index }),
        None => Ok(()),
    }
}
