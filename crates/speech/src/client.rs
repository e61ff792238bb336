//! HTTP client for the text-to-speech API.

use std::path::PathBuf;

use emivid_core::voice::voice_for_language;

use crate::audio::AudioFile;

/// Errors from the speech synthesis layer.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Speech API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The API answered 2xx but produced no audio bytes.
    #[error("Speech API returned empty audio")]
    EmptyAudio,

    #[error("Failed to write audio file: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP client for a single text-to-speech provider.
pub struct SpeechClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    scratch_dir: PathBuf,
}

impl SpeechClient {
    /// Create a new client.
    ///
    /// * `api_url`     - Base HTTP URL of the speech provider.
    /// * `api_key`     - Provider API key.
    /// * `scratch_dir` - Directory for temporary audio files.
    pub fn new(api_url: String, api_key: String, scratch_dir: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            scratch_dir,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_url: String,
        api_key: String,
        scratch_dir: PathBuf,
    ) -> Self {
        Self {
            client,
            api_url,
            api_key,
            scratch_dir,
        }
    }

    /// Synthesize `text` into an MP3 in the scratch directory.
    ///
    /// The voice is chosen from the static language table; unmapped
    /// languages get the default voice. Fails on HTTP errors and on
    /// empty audio; the caller decides whether that sinks the reminder.
    pub async fn synthesize(
        &self,
        text: &str,
        language: &str,
    ) -> Result<AudioFile, SpeechError> {
        let voice_id = voice_for_language(language);

        let response = self
            .client
            .post(format!("{}/v1/text-to-speech/{voice_id}", self.api_url))
            .header("xi-api-key", &self.api_key)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SpeechError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        tokio::fs::create_dir_all(&self.scratch_dir).await?;
        let path = self
            .scratch_dir
            .join(format!("tts-{}.mp3", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!(
            voice_id,
            language,
            bytes = bytes.len(),
            path = %path.display(),
            "Synthesized reminder audio",
        );

        Ok(AudioFile::new(path))
    }
}
