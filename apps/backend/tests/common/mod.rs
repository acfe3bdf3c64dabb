//! Common test utilities and fixtures for integration tests.
//!
//! `TestContext` builds the full router around an in-memory session with a
//! scripted mask source, so every test starts from a known deck and level 0.

#![allow(dead_code)]

pub mod fixtures;

use axum::Router;
use axum_test::{TestResponse, TestServer};
use serde_json::Value;

use dettato_backend::services::speech::SpeechService;
use dettato_backend::{build_router, AppState};
use dettato_core::{CardRecord, Deck, DiacriticTable, SequenceMask, Session};

pub struct TestContext {
    pub state: AppState,
    app: Router,
}

impl TestContext {
    /// The numbers deck, no masking, speech disabled.
    pub fn new() -> Self {
        Self::with_deck(fixtures::numbers())
    }

    pub fn with_deck(records: Vec<CardRecord>) -> Self {
        Self::build(records, SequenceMask::never(), SpeechService::Disabled)
    }

    /// Mask draws are replayed in order, cycling.
    pub fn with_mask(records: Vec<CardRecord>, draws: Vec<f64>) -> Self {
        Self::build(records, SequenceMask::new(draws), SpeechService::Disabled)
    }

    pub fn with_speech(records: Vec<CardRecord>, speech: SpeechService) -> Self {
        Self::build(records, SequenceMask::never(), speech)
    }

    fn build(records: Vec<CardRecord>, mask: SequenceMask, speech: SpeechService) -> Self {
        let session = Session::new(
            Deck::from_records(records),
            DiacriticTable::italian().expect("built-in diacritics table"),
            Box::new(mask),
        );
        let state = AppState::new(session, speech);
        let app = build_router(state.clone());
        Self { state, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Failed to start test server")
    }
}

/// Type `answer` one key at a time and return the last response body.
pub async fn type_answer(server: &TestServer, answer: &str) -> Value {
    let mut last = Value::Null;
    for value in fixtures::keystrokes(answer) {
        let response: TestResponse = server
            .post("/api/session/input")
            .json(&fixtures::input(&value))
            .await;
        response.assert_status_ok();
        last = response.json();
    }
    last
}
