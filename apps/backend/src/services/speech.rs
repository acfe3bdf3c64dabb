//! Speech synthesis for completed answers.
//!
//! Audio is an optional collaborator: when synthesis is disabled or fails,
//! the session treats playback as finished immediately so grading never
//! waits on it.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

/// Speech errors.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Speech synthesis is disabled")]
    Disabled,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Speech backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Speech backend returned no audio")]
    EmptyAudio,
}

/// Synthesized audio.
#[derive(Debug, Clone)]
pub struct Audio {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    voice: &'a str,
    format: &'a str,
}

/// Client for an HTTP text-to-speech endpoint.
///
/// Sends `{"text", "voice", "format": "mp3"}` as JSON and expects the audio
/// as the response body.
#[derive(Debug, Clone)]
pub struct HttpSynthesizer {
    client: Client,
    url: String,
    voice: String,
}

impl HttpSynthesizer {
    pub fn new(url: String, voice: String, timeout: Duration) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SpeechError::Network(e.to_string()))?;
        Ok(Self { client, url, voice })
    }

    pub async fn synthesize(&self, text: &str) -> Result<Audio, SpeechError> {
        let response = self
            .client
            .post(&self.url)
            .json(&SynthesizeRequest {
                text,
                voice: &self.voice,
                format: "mp3",
            })
            .send()
            .await
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpeechError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Network(e.to_string()))?;
        if bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        Ok(Audio {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

/// Configured speech service.
#[derive(Debug, Clone)]
pub enum SpeechService {
    Disabled,
    Http(HttpSynthesizer),
}

impl SpeechService {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    pub async fn synthesize(&self, text: &str) -> Result<Audio, SpeechError> {
        match self {
            Self::Disabled => Err(SpeechError::Disabled),
            Self::Http(synthesizer) => synthesizer.synthesize(text).await,
        }
    }
}
