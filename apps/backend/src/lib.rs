pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dettato_core::{Deck, DiacriticTable, MaskSource, RngMask, Session};

use crate::config::Config;
use crate::services::speech::{HttpSynthesizer, SpeechService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub speech: Arc<SpeechService>,
}

impl AppState {
    pub fn new(session: Session, speech: SpeechService) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            speech: Arc::new(speech),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/session", get(routes::session::snapshot))
        .route("/api/session/start", post(routes::session::start))
        .route("/api/session/input", post(routes::session::input))
        .route("/api/session/reset", post(routes::session::reset))
        .route(
            "/api/session/playback-finished",
            post(routes::session::playback_finished),
        )
        .route("/api/session/audio", get(routes::session::audio))
        .route("/api/upcoming", get(routes::deck::upcoming))
        .route("/api/deck", get(routes::deck::list))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load the deck and diacritics table named by the configuration and wire
/// them into a fresh session.
pub fn build_session(config: &Config) -> anyhow::Result<Session> {
    let deck = match &config.deck_path {
        Some(path) => load_deck(path)?,
        None => Deck::sample().context("Built-in sample deck is invalid")?,
    };

    let diacritics = match &config.diacritics_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read diacritics from {}", path.display()))?;
            DiacriticTable::from_json(&content)
                .with_context(|| format!("Invalid diacritics table {}", path.display()))?
        }
        None => DiacriticTable::italian().context("Built-in diacritics table is invalid")?,
    };

    let mask: Box<dyn MaskSource> = match config.mask_seed {
        Some(seed) => Box::new(RngMask::seeded(seed)),
        None => Box::new(RngMask::from_entropy()),
    };

    tracing::info!(
        cards = deck.len(),
        diacritics = diacritics.len(),
        policy = config.selection_policy.as_str(),
        "session ready"
    );

    Ok(Session::new(deck, diacritics, mask).with_policy(config.selection_policy))
}

fn load_deck(path: &Path) -> anyhow::Result<Deck> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read deck from {}", path.display()))?;

    let is_markdown = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));

    let deck = if is_markdown {
        Deck::from_markdown(&content)
    } else {
        Deck::from_json(&content)
    };
    deck.with_context(|| format!("Invalid deck {}", path.display()))
}

pub fn build_speech(config: &Config) -> anyhow::Result<SpeechService> {
    match &config.speech_url {
        Some(url) => {
            let synthesizer = HttpSynthesizer::new(
                url.clone(),
                config.speech_voice.clone(),
                config.speech_timeout,
            )?;
            tracing::info!(url = %url, voice = %config.speech_voice, "speech synthesis enabled");
            Ok(SpeechService::Http(synthesizer))
        }
        None => {
            tracing::info!("speech synthesis disabled");
            Ok(SpeechService::Disabled)
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Read after the subscriber is installed so config warnings are logged.
    let config = Config::from_env();

    let session = build_session(&config)?;
    let speech = build_speech(&config)?;
    let app = build_router(AppState::new(session, speech));

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
