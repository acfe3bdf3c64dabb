//! Deck endpoints

use axum::{extract::State, Json};

use crate::models::*;
use crate::AppState;

/// GET /api/upcoming
pub async fn upcoming(State(state): State<AppState>) -> Json<UpcomingResponse> {
    let session = state.session.lock().await;
    Json(UpcomingResponse {
        level: session.level(),
        cards: session.upcoming(),
    })
}

/// GET /api/deck
pub async fn list(State(state): State<AppState>) -> Json<DeckResponse> {
    let session = state.session.lock().await;
    let cards: Vec<Flashcard> = session.deck().iter().cloned().collect();
    Json(DeckResponse {
        total: cards.len(),
        cards,
    })
}
