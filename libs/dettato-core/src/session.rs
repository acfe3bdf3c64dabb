//! Drill session: the logical clock, the active card and its answer cells.
//!
//! ```text
//! NotStarted --start--> Drilling --last key--> AwaitingPlayback
//!                          ^                         |
//!                          +----playback_finished----+
//! ```
//!
//! Grading waits for the playback notification. Callers without audio
//! should send it as soon as the answer is completed.

use crate::deck::Deck;
use crate::diacritics::DiacriticTable;
use crate::mask::MaskSource;
use crate::scheduler;
use crate::selection::{self, UpcomingEntry};
use crate::typing::{self, InputOutcome};
use crate::types::{CardId, Cell, Flashcard, SchedulingState, SelectionPolicy};
use serde::Serialize;

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    /// Typing the active card, or waiting for a card to become due.
    Drilling,
    /// Answer complete; grading waits for playback to finish.
    AwaitingPlayback { mistakes: usize },
}

/// A card that has just been graded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradedCard {
    pub id: CardId,
    pub mistakes: usize,
    /// Clock value the card was graded at.
    pub level: i64,
    pub state: SchedulingState,
}

pub struct Session {
    deck: Deck,
    diacritics: DiacriticTable,
    mask: Box<dyn MaskSource>,
    policy: SelectionPolicy,
    level: i64,
    phase: Phase,
    active: Option<CardId>,
    input: String,
    cells: Vec<Cell>,
}

impl Session {
    pub fn new(deck: Deck, diacritics: DiacriticTable, mask: Box<dyn MaskSource>) -> Self {
        Self {
            deck,
            diacritics,
            mask,
            policy: SelectionPolicy::default(),
            level: 0,
            phase: Phase::NotStarted,
            active: None,
            input: String::new(),
            cells: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn level(&self) -> i64 {
        self.level
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn active_card(&self) -> Option<&Flashcard> {
        self.active.and_then(|id| self.deck.get(id))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Input accepted so far, in the answer's own characters.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether the active card should be played aloud before typing starts.
    /// Only cards that have never been recalled are.
    pub fn intro_playback(&self) -> bool {
        self.active_card()
            .map(|card| card.state.repetition == 0)
            .unwrap_or(false)
    }

    /// Start the clock at 1 and begin the first due card.
    /// Does nothing once the session has started.
    pub fn start(&mut self) -> Option<CardId> {
        if self.phase != Phase::NotStarted {
            return self.active;
        }
        self.level = 1;
        self.phase = Phase::Drilling;
        tracing::info!(cards = self.deck.len(), "session started");
        self.begin_next()
    }

    /// Earliest-due card at the current level.
    pub fn select_active_card(&self) -> Option<CardId> {
        selection::select_active_card(&self.deck, self.level, self.policy)
    }

    /// Make `id` the active card with fresh cells and an empty input.
    /// Returns false if the id is unknown.
    pub fn begin_card(&mut self, id: CardId) -> bool {
        let Some(card) = self.deck.get(id) else {
            tracing::warn!(card_id = id, "cannot begin unknown card");
            return false;
        };
        self.cells = typing::init_cells(&card.answer, &card.state, self.mask.as_mut());
        self.input.clear();
        self.active = Some(id);
        tracing::debug!(
            card_id = id,
            level = self.level,
            masked = self.cells.iter().filter(|cell| cell.hidden).count(),
            "card begun"
        );
        true
    }

    /// Feed the text field's new value for the active card.
    pub fn type_input(&mut self, new_input: &str) -> InputOutcome {
        if self.phase != Phase::Drilling || self.active.is_none() {
            tracing::debug!(phase = ?self.phase, "input ignored without a card to type");
            return InputOutcome::Rejected;
        }

        let change =
            typing::on_input_change(&self.input, new_input, &mut self.cells, &self.diacritics);
        self.input = change.accepted;

        match change.outcome {
            InputOutcome::Rejected => {
                tracing::debug!("input change rejected");
            }
            outcome if outcome.is_completed() => {
                let mistakes = typing::mistake_count(&self.cells);
                tracing::debug!(mistakes, "answer completed");
                self.phase = Phase::AwaitingPlayback { mistakes };
            }
            _ => {}
        }
        change.outcome
    }

    /// Clear the attempt at the active card: styles go back to new, masks
    /// stay, the input is emptied.
    pub fn reset_attempt(&mut self) {
        if self.phase != Phase::Drilling {
            return;
        }
        typing::reset_cells(&mut self.cells);
        self.input.clear();
    }

    /// Grade `id` with `mistakes` at the current level and advance the clock.
    pub fn complete_card(&mut self, id: CardId, mistakes: usize) -> Option<GradedCard> {
        let card = self.deck.get(id)?;
        let grade = i64::try_from(mistakes).unwrap_or(i64::MAX);
        let state = scheduler::schedule(&card.state, grade, self.level);
        self.deck.set_state(id, state);

        let graded = GradedCard {
            id,
            mistakes,
            level: self.level,
            state,
        };
        self.level += 1;

        tracing::info!(
            card_id = id,
            mistakes,
            interval = state.interval,
            repetition = state.repetition,
            efactor = state.efactor,
            level = self.level,
            "card graded"
        );
        Some(graded)
    }

    /// Playback of the completed answer finished: grade the card and move
    /// on to the next due one. Returns None unless an answer was waiting.
    pub fn playback_finished(&mut self) -> Option<GradedCard> {
        let Phase::AwaitingPlayback { mistakes } = self.phase else {
            return None;
        };
        let id = self.active?;
        let graded = self.complete_card(id, mistakes);
        self.phase = Phase::Drilling;
        self.begin_next();
        graded
    }

    /// Scheduled cards in selection order.
    pub fn upcoming(&self) -> Vec<UpcomingEntry> {
        selection::upcoming(&self.deck, self.level, self.policy)
    }

    fn begin_next(&mut self) -> Option<CardId> {
        match self.select_active_card() {
            Some(id) => {
                self.begin_card(id);
                Some(id)
            }
            None => {
                tracing::info!(level = self.level, "no card due");
                self.active = None;
                self.cells.clear();
                self.input.clear();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::SequenceMask;
    use crate::types::{CardRecord, CellStyle};
    use pretty_assertions::assert_eq;

    fn session(records: Vec<CardRecord>) -> Session {
        Session::new(
            Deck::from_records(records),
            DiacriticTable::italian().unwrap(),
            Box::new(SequenceMask::never()),
        )
    }

    fn type_all(session: &mut Session, keys: &str) -> InputOutcome {
        let mut outcome = InputOutcome::Unchanged;
        for key in keys.chars() {
            let mut next = session.input().to_string();
            next.push(key);
            outcome = session.type_input(&next);
        }
        outcome
    }

    #[test]
    fn not_started_until_start() {
        let mut session = session(vec![CardRecord::new("uno", "due")]);
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.level(), 0);
        assert!(session.active_card().is_none());
        assert_eq!(session.type_input("d"), InputOutcome::Rejected);

        assert_eq!(session.start(), Some(0));
        assert_eq!(session.phase(), Phase::Drilling);
        assert_eq!(session.level(), 1);
        assert_eq!(session.cells().len(), 3);
        assert!(session.intro_playback());
    }

    #[test]
    fn start_twice_is_a_no_op() {
        let mut session = session(vec![CardRecord::new("uno", "due")]);
        session.start();
        type_all(&mut session, "d");
        assert_eq!(session.start(), Some(0));
        assert_eq!(session.level(), 1);
        assert_eq!(session.input(), "d");
    }

    #[test]
    fn perfect_answer_is_graded_after_playback() {
        let mut session = session(vec![
            CardRecord::new("uno", "due"),
            CardRecord::new("tre", "quattro"),
        ]);
        session.start();

        let outcome = type_all(&mut session, "due");
        assert!(outcome.is_completed());
        assert_eq!(session.phase(), Phase::AwaitingPlayback { mistakes: 0 });
        assert!(session.cells().iter().all(|c| c.style == CellStyle::Correct));
        assert_eq!(session.level(), 1);

        // typing is closed while waiting
        assert_eq!(session.type_input("duex"), InputOutcome::Rejected);

        let graded = session.playback_finished().unwrap();
        assert_eq!(graded.id, 0);
        assert_eq!(graded.level, 1);
        assert_eq!(graded.state.interval, 3);
        assert_eq!(graded.state.repetition, 1);
        assert_eq!(graded.state.efactor, 1.7000000000000002);
        assert_eq!(session.deck().get(0).unwrap().state, graded.state);
        assert_eq!(session.deck().get(0).unwrap().question, "uno");
        assert_eq!(session.level(), 2);

        assert_eq!(session.active_card().unwrap().id, 1);
        assert_eq!(session.input(), "");
        assert_eq!(session.phase(), Phase::Drilling);
    }

    #[test]
    fn one_mistake_still_recalls() {
        let mut session = session(vec![CardRecord::new("uno", "due")]);
        session.start();
        type_all(&mut session, "x");
        type_all(&mut session, "ue");
        assert_eq!(session.input(), "");

        // input stayed empty after the wrong key, so retype from the start
        type_all(&mut session, "due");
        assert_eq!(session.phase(), Phase::AwaitingPlayback { mistakes: 1 });

        let graded = session.playback_finished().unwrap();
        assert_eq!(graded.mistakes, 1);
        assert_eq!(graded.state.repetition, 1);
        assert_eq!(graded.state.interval, 3);
        assert_eq!(graded.state.efactor, 1.96);
    }

    #[test]
    fn three_mistakes_fail_the_card() {
        let mut session = session(vec![CardRecord::new("uno", "due")]);
        session.start();
        type_all(&mut session, "x");
        type_all(&mut session, "dy");
        // the wrong last key still completes the answer
        let outcome = type_all(&mut session, "uz");
        assert!(outcome.is_completed());
        assert_eq!(session.phase(), Phase::AwaitingPlayback { mistakes: 3 });

        let graded = session.playback_finished().unwrap();
        assert_eq!(graded.mistakes, 3);
        assert_eq!(graded.state.repetition, 0);
        assert_eq!(graded.state.interval, 3);
        assert_eq!(graded.state.efactor, 2.36);
    }

    #[test]
    fn every_position_missed_once() {
        let mut session = session(vec![CardRecord::new("one", "abcdefgh")]);
        session.start();
        for key in "abcdefgh".chars() {
            type_all(&mut session, "z");
            type_all(&mut session, &key.to_string());
        }
        let graded = session.playback_finished().unwrap();
        assert_eq!(graded.mistakes, 8);
        assert_eq!(graded.state.repetition, 0);
        assert_eq!(graded.state.efactor, 2.66);
    }

    #[test]
    fn playback_finished_without_answer_is_ignored() {
        let mut session = session(vec![CardRecord::new("uno", "due")]);
        assert!(session.playback_finished().is_none());
        session.start();
        assert!(session.playback_finished().is_none());
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn nothing_due_leaves_no_active_card() {
        let mut session = session(vec![CardRecord::new("uno", "due")]);
        session.start();
        type_all(&mut session, "due");
        session.playback_finished();

        // interval 3, level 2
        assert!(session.active_card().is_none());
        assert!(session.cells().is_empty());
        assert_eq!(session.type_input("d"), InputOutcome::Rejected);
        assert!(!session.intro_playback());
    }

    #[test]
    fn cards_come_back_when_due() {
        let mut session = session(vec![
            CardRecord::new("one", "uno"),
            CardRecord::new("two", "due"),
        ]);
        session.start();
        let mut order = Vec::new();
        for _ in 0..4 {
            let card = session.active_card().unwrap();
            order.push(card.id);
            let answer = card.answer.clone();
            type_all(&mut session, &answer);
            session.playback_finished();
        }
        // level 1: card 0 -> due 3; level 2: card 1 -> due 4;
        // level 3: card 0 -> due 9; level 4: card 1 -> due 10
        assert_eq!(order, vec![0, 1, 0, 1]);
        assert_eq!(session.level(), 5);
        assert!(session.active_card().is_none());

        let upcoming = session.upcoming();
        assert_eq!(upcoming.iter().map(|e| e.interval).collect::<Vec<_>>(), vec![9, 10]);
        assert!(!upcoming[0].is_next);
    }

    #[test]
    fn recalled_cards_are_masked_again_on_each_visit() {
        let mut session = Session::new(
            Deck::from_records(vec![CardRecord::new("one", "uno")]),
            DiacriticTable::italian().unwrap(),
            Box::new(SequenceMask::new(vec![0.99])),
        );
        session.start();
        assert!(session.cells().iter().all(|c| !c.hidden));
        type_all(&mut session, "uno");
        session.playback_finished();
        assert!(session.active_card().is_none());

        // bring the card back and make it active again
        assert!(session.begin_card(0));
        assert!(!session.intro_playback());
        assert!(session.cells().iter().all(|c| c.hidden));
    }

    #[test]
    fn reset_attempt_clears_styles_and_input() {
        let mut session = session(vec![CardRecord::new("uno", "due")]);
        session.start();
        type_all(&mut session, "dx");
        assert_eq!(session.input(), "d");

        session.reset_attempt();
        assert_eq!(session.input(), "");
        assert!(session.cells().iter().all(|c| c.style == CellStyle::New));
    }

    #[test]
    fn complete_card_advances_level_once() {
        let mut session = session(vec![CardRecord::new("uno", "due")]);
        session.start();
        let graded = session.complete_card(0, 0).unwrap();
        assert_eq!(graded.level, 1);
        assert_eq!(session.level(), 2);
        assert!(session.complete_card(9, 0).is_none());
        assert_eq!(session.level(), 2);
    }
}
