//! API request and response types

use serde::{Deserialize, Serialize};

pub use dettato_core::{
    CardId, Cell, CellStyle, Flashcard, GradedCard, InputOutcome, Phase, SchedulingState,
    Session, UpcomingEntry,
};

// === Request Types ===

/// New value of the answer field.
#[derive(Debug, Clone, Deserialize)]
pub struct InputRequest {
    pub input: String,
}

// === Response Types ===

/// One answer cell as rendered, masks applied.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CellView {
    pub display: char,
    pub style: CellStyle,
    pub hidden: bool,
}

impl From<&Cell> for CellView {
    fn from(cell: &Cell) -> Self {
        Self {
            display: cell.display(),
            style: cell.style,
            hidden: cell.hidden,
        }
    }
}

/// Current state of the drill.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub level: i64,
    pub phase: Phase,
    pub card_id: Option<CardId>,
    pub question: Option<String>,
    pub cells: Vec<CellView>,
    pub input: String,
    /// Index of the next cell to type.
    pub cursor: usize,
    pub intro_playback: bool,
    pub speech_available: bool,
}

impl SessionSnapshot {
    pub fn capture(session: &Session, speech_available: bool) -> Self {
        let card = session.active_card();
        Self {
            level: session.level(),
            phase: session.phase(),
            card_id: card.map(|c| c.id),
            question: card.map(|c| c.question.clone()),
            cells: session.cells().iter().map(CellView::from).collect(),
            input: session.input().to_string(),
            cursor: session.input().chars().count(),
            intro_playback: session.intro_playback(),
            speech_available,
        }
    }
}

/// Result of feeding a new input value.
#[derive(Debug, Clone, Serialize)]
pub struct InputResponse {
    pub outcome: InputOutcome,
    /// Set when completing the answer graded the card right away.
    pub graded: Option<GradedCard>,
    pub session: SessionSnapshot,
}

/// Result of a playback notification.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackResponse {
    pub graded: GradedCard,
    pub session: SessionSnapshot,
}

/// Scheduled cards in selection order.
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingResponse {
    pub level: i64,
    pub cards: Vec<UpcomingEntry>,
}

/// Every card with its scheduling state.
#[derive(Debug, Clone, Serialize)]
pub struct DeckResponse {
    pub total: usize,
    pub cards: Vec<Flashcard>,
}
