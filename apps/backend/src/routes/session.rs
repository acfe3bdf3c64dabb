//! Drill session endpoints

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/session
pub async fn snapshot(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let session = state.session.lock().await;
    Json(SessionSnapshot::capture(&session, state.speech.is_available()))
}

/// POST /api/session/start
pub async fn start(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut session = state.session.lock().await;
    session.start();
    Json(SessionSnapshot::capture(&session, state.speech.is_available()))
}

/// POST /api/session/input
pub async fn input(
    State(state): State<AppState>,
    Json(payload): Json<InputRequest>,
) -> Json<InputResponse> {
    let mut session = state.session.lock().await;
    let outcome = session.type_input(&payload.input);

    // Nothing will report playback without audio, so grade now.
    let graded = if outcome.is_completed() && !state.speech.is_available() {
        session.playback_finished()
    } else {
        None
    };

    Json(InputResponse {
        outcome,
        graded,
        session: SessionSnapshot::capture(&session, state.speech.is_available()),
    })
}

/// POST /api/session/reset
pub async fn reset(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut session = state.session.lock().await;
    session.reset_attempt();
    Json(SessionSnapshot::capture(&session, state.speech.is_available()))
}

/// POST /api/session/playback-finished
pub async fn playback_finished(State(state): State<AppState>) -> Result<Json<PlaybackResponse>> {
    let mut session = state.session.lock().await;
    let graded = session
        .playback_finished()
        .ok_or_else(|| ApiError::Conflict("No answer is awaiting playback".to_string()))?;

    Ok(Json(PlaybackResponse {
        graded,
        session: SessionSnapshot::capture(&session, state.speech.is_available()),
    }))
}

/// GET /api/session/audio
///
/// Speaks the active card's answer. If synthesis fails while that answer is
/// awaiting playback, the card is graded as if playback had finished.
pub async fn audio(State(state): State<AppState>) -> Result<Response> {
    let (card_id, text) = {
        let session = state.session.lock().await;
        let card = session
            .active_card()
            .ok_or_else(|| ApiError::NotFound("No active card".to_string()))?;
        (card.id, card.answer.clone())
    };

    match state.speech.synthesize(&text).await {
        Ok(audio) => {
            tracing::debug!(card_id, bytes = audio.bytes.len(), "answer synthesized");
            Ok(([(header::CONTENT_TYPE, audio.content_type)], audio.bytes).into_response())
        }
        Err(e) => {
            tracing::warn!(card_id, error = %e, "speech synthesis failed");

            let mut session = state.session.lock().await;
            let awaiting = matches!(session.phase(), Phase::AwaitingPlayback { .. })
                && session.active_card().map(|c| c.id) == Some(card_id);
            if awaiting {
                session.playback_finished();
            }

            Err(ApiError::SpeechUnavailable(e.to_string()))
        }
    }
}
