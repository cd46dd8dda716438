//! Text-to-speech for verdicts. Failures never reach the caller of
//! [`spawn_narration`]; they are logged and turned into `None`.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::config::SpeechConfig;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Encoded audio (MP3 for the HTTP client) for `text`
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("synthesizer returned no audio")]
    EmptyAudio,
    #[error("nothing to say")]
    EmptyText,
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SpeechError::Timeout
        } else {
            SpeechError::Network(err.to_string())
        }
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

/// Posts `{ "text", "voice" }` as JSON and reads the raw audio body.
pub struct HttpSpeechClient {
    endpoint: Url,
    voice: String,
    client: reqwest::Client,
}

impl HttpSpeechClient {
    pub fn with_client(endpoint: Url, voice: String, client: reqwest::Client) -> Self {
        Self {
            endpoint,
            voice,
            client,
        }
    }

    /// `None` when no endpoint is configured.
    pub fn from_config(config: &SpeechConfig) -> Result<Option<Self>, reqwest::Error> {
        let Some(ref endpoint) = config.endpoint else {
            return Ok(None);
        };
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Some(Self::with_client(
            endpoint.clone(),
            config.voice.clone(),
            client,
        )))
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&SpeechRequest {
                text,
                voice: &self.voice,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Status(status.as_u16()));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        Ok(audio.to_vec())
    }
}

/// Drop markdown emphasis and heading characters so they are not read aloud.
pub fn strip_markup(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '*' | '#' | '_' | '`' | '~'))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Synthesize in the background. The handle resolves to `None` on any failure.
pub fn spawn_narration(
    synthesizer: Arc<dyn SpeechSynthesizer>,
    text: &str,
) -> JoinHandle<Option<Vec<u8>>> {
    let spoken = strip_markup(text);
    tokio::spawn(async move {
        if spoken.is_empty() {
            warn!(error = %SpeechError::EmptyText, "Skipping narration");
            return None;
        }
        match synthesizer.synthesize(&spoken).await {
            Ok(audio) => {
                debug!(bytes = audio.len(), "Narration synthesized");
                Some(audio)
            }
            Err(e) => {
                warn!(error = %e, "Narration failed, continuing without audio");
                None
            }
        }
    })
}
