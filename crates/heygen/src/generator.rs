//! End-to-end video render: upload voice audio, submit generation,
//! poll to a terminal state, download the result.
//!
//! The poll loop is deadline-bounded: a render that is still
//! non-terminal when the deadline passes is a timeout, regardless of
//! what the provider would have said next.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use emivid_core::media::{resolve_public_url, validate_download_url, video_relative_path};
use emivid_speech::AudioFile;
use tokio_util::sync::CancellationToken;

use crate::api::{HeygenApi, HeygenApiError, VideoStatus, VideoStatusInfo, VoiceInput};
use crate::retry::{upload_with_retry, RetryConfig};

/// Content type for uploaded voice audio.
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Errors from the video generation layer.
#[derive(Debug, thiserror::Error)]
pub enum HeygenError {
    #[error(transparent)]
    Api(#[from] HeygenApiError),

    /// The render was still non-terminal when the deadline passed.
    #[error("Video {video_id} timed out after {waited:?}")]
    Timeout { video_id: String, waited: Duration },

    /// The provider reported the render as failed.
    #[error("Video {video_id} generation failed")]
    GenerationFailed { video_id: String },

    /// Completed status without a result URL.
    #[error("Video {video_id} completed without a result URL")]
    MissingResult { video_id: String },

    /// Completed status with a result URL that cannot be downloaded.
    #[error("Video {video_id} returned an unusable result URL: {reason}")]
    BadResultUrl { video_id: String, reason: String },

    #[error("Failed to read voice audio: {0}")]
    Io(#[from] std::io::Error),
}

/// Voice input for a render, before any provider interaction.
#[derive(Debug)]
pub enum VoiceSource {
    /// Locally synthesized audio; uploaded as an asset first. The guard
    /// is consumed by the render, so the temp file is deleted whether
    /// or not the upload succeeds.
    Audio(AudioFile),
    /// Raw script text spoken by one of the provider's voices.
    Text { text: String, voice_id: String },
}

/// A completed render stored under the media directory.
#[derive(Debug, Clone)]
pub struct RenderedVideo {
    pub video_id: String,
    pub local_path: PathBuf,
    /// Path relative to the media root; what the reminder row stores.
    pub relative_path: String,
    /// URL the video is served under, built from the media URL prefix.
    pub public_url: String,
}

/// Tunables for a [`VideoGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Provider avatar presenting the script.
    pub avatar_id: String,
    /// Interval between status polls.
    pub poll_interval: Duration,
    /// Wall-clock deadline for one render.
    pub timeout: Duration,
    /// Root of the local media tree.
    pub media_dir: PathBuf,
    /// Public prefix the media tree is served under.
    pub media_url_prefix: String,
    /// Upload retry strategy.
    pub retry: RetryConfig,
}

/// Drives one avatar-video render from voice input to a local file.
pub struct VideoGenerator {
    api: HeygenApi,
    config: GeneratorConfig,
}

impl VideoGenerator {
    pub fn new(api: HeygenApi, config: GeneratorConfig) -> Self {
        Self { api, config }
    }

    /// Render a video for the given voice input.
    ///
    /// Steps: upload audio (if any, with bounded retry), submit the
    /// generation request, poll until terminal or deadline, download
    /// the result under the media directory.
    pub async fn render(
        &self,
        voice: VoiceSource,
        cancel: &CancellationToken,
    ) -> Result<RenderedVideo, HeygenError> {
        let voice_input = match voice {
            VoiceSource::Audio(audio) => {
                let bytes = audio.read().await?;
                let asset_id = upload_with_retry(
                    &self.api,
                    &bytes,
                    AUDIO_CONTENT_TYPE,
                    &self.config.retry,
                    cancel,
                )
                .await?;
                // The provider has the audio now; the scratch file goes.
                drop(audio);
                VoiceInput::AudioAsset { asset_id }
            }
            VoiceSource::Text { text, voice_id } => VoiceInput::Text {
                input_text: text,
                voice_id,
            },
        };

        let video_id = self
            .api
            .generate_video(&self.config.avatar_id, &voice_input)
            .await?;
        tracing::info!(video_id = %video_id, "Video generation submitted");

        let api = self.api.clone();
        let poll_id = video_id.clone();
        let video_url = poll_until_terminal(
            &video_id,
            move || {
                let api = api.clone();
                let id = poll_id.clone();
                async move { api.video_status(&id).await }
            },
            self.config.poll_interval,
            self.config.timeout,
            cancel,
        )
        .await?;

        validate_download_url(&video_url).map_err(|e| HeygenError::BadResultUrl {
            video_id: video_id.clone(),
            reason: e.to_string(),
        })?;

        let relative = video_relative_path(&video_id);
        let local_path = self.config.media_dir.join(&relative);
        self.api.download(&video_url, &local_path).await?;

        let public_url = resolve_public_url(&self.config.media_url_prefix, &relative);
        tracing::info!(video_id = %video_id, public_url = %public_url, "Video ready");

        Ok(RenderedVideo {
            video_id,
            local_path,
            relative_path: relative,
            public_url,
        })
    }
}

/// Poll `fetch_status` until a terminal state or the deadline.
///
/// Returns the result URL on completion. Never yields a result while
/// the status is non-terminal; once the deadline passes the outcome is
/// [`HeygenError::Timeout`] no matter what the provider reports next.
async fn poll_until_terminal<F, Fut>(
    video_id: &str,
    mut fetch_status: F,
    poll_interval: Duration,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<String, HeygenError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<VideoStatusInfo, HeygenApiError>>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        if tokio::time::Instant::now() >= deadline {
            return Err(HeygenError::Timeout {
                video_id: video_id.to_string(),
                waited: timeout,
            });
        }

        let info = fetch_status().await?;
        match info.status {
            VideoStatus::Completed => {
                return info.video_url.ok_or_else(|| HeygenError::MissingResult {
                    video_id: video_id.to_string(),
                });
            }
            VideoStatus::Failed => {
                return Err(HeygenError::GenerationFailed {
                    video_id: video_id.to_string(),
                });
            }
            VideoStatus::Pending | VideoStatus::Processing => {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(HeygenApiError::Cancelled.into()),
                    _ = tokio::time::sleep(poll_interval) => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;

    fn status(s: VideoStatus, url: Option<&str>) -> VideoStatusInfo {
        VideoStatusInfo {
            status: s,
            video_url: url.map(str::to_string),
        }
    }

    /// Closure yielding a scripted status sequence; repeats the last
    /// entry once the script runs out.
    fn scripted(
        sequence: Vec<VideoStatusInfo>,
    ) -> impl FnMut() -> std::pin::Pin<
        Box<dyn Future<Output = Result<VideoStatusInfo, HeygenApiError>> + Send>,
    > {
        let queue = Arc::new(Mutex::new(VecDeque::from(sequence)));
        move || {
            let queue = queue.clone();
            Box::pin(async move {
                let mut q = queue.lock().unwrap();
                let next = if q.len() > 1 {
                    q.pop_front().unwrap()
                } else {
                    q.front().cloned().expect("sequence must not be empty")
                };
                Ok(next)
            })
        }
    }

    #[tokio::test]
    async fn completes_after_processing() {
        let cancel = CancellationToken::new();
        let fetch = scripted(vec![
            status(VideoStatus::Pending, None),
            status(VideoStatus::Processing, None),
            status(VideoStatus::Completed, Some("https://cdn.example.com/v.mp4")),
        ]);

        let url = poll_until_terminal(
            "vid-1",
            fetch,
            Duration::from_millis(1),
            Duration::from_secs(5),
            &cancel,
        )
        .await
        .unwrap();
        assert_eq!(url, "https://cdn.example.com/v.mp4");
    }

    #[tokio::test]
    async fn never_completed_times_out() {
        let cancel = CancellationToken::new();
        let fetch = scripted(vec![status(VideoStatus::Processing, None)]);

        let result = poll_until_terminal(
            "vid-1",
            fetch,
            Duration::from_millis(1),
            Duration::from_millis(20),
            &cancel,
        )
        .await;
        assert!(matches!(result, Err(HeygenError::Timeout { .. })));
    }

    #[tokio::test]
    async fn zero_timeout_wins_over_completed_status() {
        let cancel = CancellationToken::new();
        let fetch = scripted(vec![status(
            VideoStatus::Completed,
            Some("https://cdn.example.com/v.mp4"),
        )]);

        let result = poll_until_terminal(
            "vid-1",
            fetch,
            Duration::from_millis(1),
            Duration::ZERO,
            &cancel,
        )
        .await;
        assert!(matches!(result, Err(HeygenError::Timeout { .. })));
    }

    #[tokio::test]
    async fn failed_status_is_an_error() {
        let cancel = CancellationToken::new();
        let fetch = scripted(vec![
            status(VideoStatus::Processing, None),
            status(VideoStatus::Failed, None),
        ]);

        let result = poll_until_terminal(
            "vid-1",
            fetch,
            Duration::from_millis(1),
            Duration::from_secs(5),
            &cancel,
        )
        .await;
        assert!(matches!(result, Err(HeygenError::GenerationFailed { .. })));
    }

    #[tokio::test]
    async fn completed_without_url_is_an_error() {
        let cancel = CancellationToken::new();
        let fetch = scripted(vec![status(VideoStatus::Completed, None)]);

        let result = poll_until_terminal(
            "vid-1",
            fetch,
            Duration::from_millis(1),
            Duration::from_secs(5),
            &cancel,
        )
        .await;
        assert!(matches!(result, Err(HeygenError::MissingResult { .. })));
    }

    #[tokio::test]
    async fn cancellation_stops_polling() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let fetch = scripted(vec![status(VideoStatus::Processing, None)]);

        let result = poll_until_terminal(
            "vid-1",
            fetch,
            Duration::from_secs(60),
            Duration::from_secs(60),
            &cancel,
        )
        .await;
        assert!(matches!(
            result,
            Err(HeygenError::Api(HeygenApiError::Cancelled))
        ));
    }

    #[tokio::test]
    async fn audio_file_removed_even_when_upload_fails() {
        let dir = tempfile::tempdir().unwrap();
        let audio_path = dir.path().join("clip.mp3");
        std::fs::write(&audio_path, b"audio").unwrap();

        let generator = VideoGenerator::new(
            HeygenApi::new("http://127.0.0.1:9".into(), "test".into()),
            GeneratorConfig {
                avatar_id: "avatar-1".to_string(),
                poll_interval: Duration::from_millis(1),
                timeout: Duration::from_millis(50),
                media_dir: dir.path().to_path_buf(),
                media_url_prefix: "https://media.example.com".to_string(),
                retry: RetryConfig {
                    attempts: 1,
                    initial_delay: Duration::from_millis(1),
                    ..Default::default()
                },
            },
        );

        let cancel = CancellationToken::new();
        let result = generator
            .render(
                VoiceSource::Audio(AudioFile::new(audio_path.clone())),
                &cancel,
            )
            .await;

        assert!(result.is_err());
        assert!(!audio_path.exists(), "scratch audio must not outlive the render");
    }
}
