//! Picking the next due card.
//!
//! The compatible ordering is defined by a comparator that is not a strict
//! weak order: an unscheduled card (interval 0) never sorts before anything
//! while scheduled cards still order among themselves. The result depends on
//! the sorting algorithm, so it is fixed here to the run-merging sort
//! browsers use (`timsort` module) instead of `slice::sort_by`, which may
//! panic on such a comparator.

use crate::deck::Deck;
use crate::timsort;
use crate::types::{CardId, Flashcard, SchedulingState, SelectionPolicy};
use serde::Serialize;

/// Entry of the upcoming-cards list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingEntry {
    pub id: CardId,
    pub question: String,
    pub interval: i64,
    /// First entry, and already due.
    pub is_next: bool,
}

/// Whether `a` sorts strictly before `b` in the compatible ordering.
pub fn is_before(a: &SchedulingState, b: &SchedulingState) -> bool {
    a.interval < b.interval && a.interval != 0
}

/// Sort cards in place according to `policy`.
pub fn order_cards(cards: &mut [&Flashcard], policy: SelectionPolicy) {
    match policy {
        SelectionPolicy::Compatible => {
            timsort::sort_by(cards, |a, b| is_before(&a.state, &b.state))
        }
        SelectionPolicy::Ascending => {
            cards.sort_by_key(|card| (card.state.is_unscheduled(), card.state.interval))
        }
    }
}

/// Earliest-due card at `level`, if any card is due.
pub fn select_active_card(deck: &Deck, level: i64, policy: SelectionPolicy) -> Option<CardId> {
    let mut due: Vec<&Flashcard> = deck.iter().filter(|card| card.state.is_due(level)).collect();
    order_cards(&mut due, policy);
    due.first().map(|card| card.id)
}

/// Scheduled cards in selection order, for display.
pub fn upcoming(deck: &Deck, level: i64, policy: SelectionPolicy) -> Vec<UpcomingEntry> {
    let mut scheduled: Vec<&Flashcard> = deck
        .iter()
        .filter(|card| !card.state.is_unscheduled())
        .collect();
    order_cards(&mut scheduled, policy);

    scheduled
        .into_iter()
        .enumerate()
        .map(|(index, card)| UpcomingEntry {
            id: card.id,
            question: card.question.clone(),
            interval: card.state.interval,
            is_next: index == 0 && card.state.is_due(level),
        })
        .collect()
}
