//! REST API client for the avatar-video provider endpoints.
//!
//! Wraps the HeyGen HTTP API (asset upload, generation submit, status
//! polling, result download) using [`reqwest`].

use std::path::Path;

use serde::Deserialize;

/// Avatar rendering style sent with every generation request.
pub const AVATAR_STYLE: &str = "normal";
/// Solid background color behind the avatar.
pub const BACKGROUND_COLOR: &str = "#0000FF";
/// Output video width in pixels.
pub const VIDEO_WIDTH: u32 = 1280;
/// Output video height in pixels.
pub const VIDEO_HEIGHT: u32 = 720;

/// Errors from the provider REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum HeygenApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("HeyGen API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response without the expected `data` payload.
    #[error("HeyGen response missing data: {0}")]
    MissingData(String),

    /// The operation was cancelled before it could complete.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Failed to write downloaded video: {0}")]
    Io(#[from] std::io::Error),
}

/// Render state reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoStatus {
    /// Queued, not yet picked up.
    Pending,
    /// Actively rendering.
    Processing,
    /// Done; a result URL is available.
    Completed,
    /// The provider gave up on this job.
    Failed,
}

impl VideoStatus {
    /// Map a provider status string to a [`VideoStatus`].
    ///
    /// Unrecognized strings count as not-yet-ready rather than failure;
    /// the poll deadline bounds how long that optimism can last.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "pending" | "waiting" => VideoStatus::Pending,
            "processing" => VideoStatus::Processing,
            "completed" => VideoStatus::Completed,
            "failed" | "error" => VideoStatus::Failed,
            other => {
                tracing::debug!(status = other, "Unknown provider status, treating as pending");
                VideoStatus::Pending
            }
        }
    }

    /// Whether this status ends the poll loop.
    pub fn is_terminal(self) -> bool {
        matches!(self, VideoStatus::Completed | VideoStatus::Failed)
    }
}

/// One observation from the status endpoint.
#[derive(Debug, Clone)]
pub struct VideoStatusInfo {
    pub status: VideoStatus,
    /// Download URL, present once the render completes.
    pub video_url: Option<String>,
}

/// Voice half of a generation request: either text the provider speaks
/// with one of its voices, or audio we synthesized and uploaded.
#[derive(Debug, Clone)]
pub enum VoiceInput {
    Text { input_text: String, voice_id: String },
    AudioAsset { asset_id: String },
}

impl VoiceInput {
    fn to_payload(&self) -> serde_json::Value {
        match self {
            VoiceInput::Text {
                input_text,
                voice_id,
            } => serde_json::json!({
                "type": "text",
                "input_text": input_text,
                "voice_id": voice_id,
            }),
            VoiceInput::AudioAsset { asset_id } => serde_json::json!({
                "type": "audio",
                "audio_asset_id": asset_id,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GenerateData {
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusData {
    status: String,
    video_url: Option<String>,
}

/// HTTP client for the avatar-video provider.
#[derive(Clone)]
pub struct HeygenApi {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HeygenApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `https://api.heygen.com`.
    /// * `api_key` - Key sent in the `X-Api-Key` header.
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across services).
    pub fn with_client(client: reqwest::Client, api_url: String, api_key: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
        }
    }

    /// Upload a media asset, returning the provider asset ID.
    ///
    /// Sends the raw bytes as a `POST /v1/asset` request body with the
    /// given content type.
    pub async fn upload_asset(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, HeygenApiError> {
        let response = self
            .client
            .post(format!("{}/v1/asset", self.api_url))
            .header("X-Api-Key", &self.api_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        let envelope: DataEnvelope<UploadData> = Self::parse_response(response).await?;
        let data = envelope
            .data
            .ok_or_else(|| HeygenApiError::MissingData("asset upload".to_string()))?;
        Ok(data.id)
    }

    /// Submit a video-generation request, returning the job's video ID.
    ///
    /// Sends a `POST /v2/video/generate` request naming the avatar and
    /// the voice input (text or uploaded audio asset).
    pub async fn generate_video(
        &self,
        avatar_id: &str,
        voice: &VoiceInput,
    ) -> Result<String, HeygenApiError> {
        let body = serde_json::json!({
            "video_inputs": [
                {
                    "character": {
                        "type": "avatar",
                        "avatar_id": avatar_id,
                        "avatar_style": AVATAR_STYLE,
                    },
                    "voice": voice.to_payload(),
                    "background": {
                        "type": "color",
                        "value": BACKGROUND_COLOR,
                    },
                }
            ],
            "dimension": {
                "width": VIDEO_WIDTH,
                "height": VIDEO_HEIGHT,
            },
        });

        let response = self
            .client
            .post(format!("{}/v2/video/generate", self.api_url))
            .header("X-Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let envelope: DataEnvelope<GenerateData> = Self::parse_response(response).await?;
        let data = envelope
            .data
            .ok_or_else(|| HeygenApiError::MissingData("video generate".to_string()))?;
        Ok(data.video_id)
    }

    /// Fetch the render status for a video ID.
    ///
    /// Sends a `GET /v1/video_status.get?video_id=...` request. An HTTP
    /// 404 means the job has not propagated yet and maps to a pending
    /// status, not an error.
    pub async fn video_status(
        &self,
        video_id: &str,
    ) -> Result<VideoStatusInfo, HeygenApiError> {
        let response = self
            .client
            .get(format!(
                "{}/v1/video_status.get?video_id={video_id}",
                self.api_url
            ))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(VideoStatusInfo {
                status: VideoStatus::Pending,
                video_url: None,
            });
        }

        let envelope: DataEnvelope<StatusData> = Self::parse_response(response).await?;
        let data = envelope
            .data
            .ok_or_else(|| HeygenApiError::MissingData("video status".to_string()))?;

        Ok(VideoStatusInfo {
            status: VideoStatus::from_provider(&data.status),
            video_url: data.video_url,
        })
    }

    /// Download a completed video to `dest`, creating parent directories.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<(), HeygenApiError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;

        tracing::debug!(url, dest = %dest.display(), bytes = bytes.len(), "Downloaded video");
        Ok(())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`HeygenApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, HeygenApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(HeygenApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, HeygenApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
