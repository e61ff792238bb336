//! Bounded-retry logic with exponential backoff for asset uploads.
//!
//! Unlike the poll loop, uploads retry a fixed number of times and then
//! give up; a provider that cannot accept the audio after that is a
//! hard failure for the reminder.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::{HeygenApi, HeygenApiError};

/// Tunable parameters for the exponential-backoff strategy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts before giving up.
    pub attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`RetryConfig::max_delay`].
pub fn next_delay(current: Duration, config: &RetryConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// Upload an asset, retrying up to [`RetryConfig::attempts`] times.
///
/// Sleeps the backoff delay between attempts, honoring `cancel`.
/// Returns the asset ID on the first success, the last error once the
/// attempts are spent, or [`HeygenApiError::Cancelled`] if the token
/// fires mid-wait.
pub async fn upload_with_retry(
    api: &HeygenApi,
    bytes: &[u8],
    content_type: &str,
    config: &RetryConfig,
    cancel: &CancellationToken,
) -> Result<String, HeygenApiError> {
    let mut delay = config.initial_delay;
    let mut last_error = HeygenApiError::Cancelled;

    for attempt in 1..=config.attempts.max(1) {
        if cancel.is_cancelled() {
            return Err(HeygenApiError::Cancelled);
        }

        match api.upload_asset(bytes.to_vec(), content_type).await {
            Ok(asset_id) => {
                tracing::debug!(attempt, asset_id = %asset_id, "Audio asset uploaded");
                return Ok(asset_id);
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "Asset upload attempt failed");
                last_error = e;
            }
        }

        if attempt < config.attempts {
            tokio::select! {
                _ = cancel.cancelled() => return Err(HeygenApiError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
            delay = next_delay(delay, config);
        }
    }

    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_delay_doubles() {
        let config = RetryConfig::default();
        let d = next_delay(Duration::from_secs(2), &config);
        assert_eq!(d, Duration::from_secs(4));
    }

    #[test]
    fn next_delay_clamps_at_max() {
        let config = RetryConfig {
            max_delay: Duration::from_secs(10),
            ..Default::default()
        };
        let d = next_delay(Duration::from_secs(8), &config);
        assert_eq!(d, Duration::from_secs(10));
    }

    #[test]
    fn full_backoff_sequence() {
        let config = RetryConfig::default();
        let mut delay = config.initial_delay;
        let expected = [2, 4, 8, 16, 30, 30];

        for &expected_secs in &expected {
            assert_eq!(delay.as_secs(), expected_secs);
            delay = next_delay(delay, &config);
        }
    }

    #[tokio::test]
    async fn cancelled_token_stops_upload() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let api = HeygenApi::new("http://127.0.0.1:9".into(), "test".into());
        let result = upload_with_retry(
            &api,
            b"audio",
            "audio/mpeg",
            &RetryConfig::default(),
            &cancel,
        )
        .await;
        assert!(matches!(result, Err(HeygenApiError::Cancelled)));
    }

    #[tokio::test]
    async fn exhausted_attempts_return_last_error() {
        let cancel = CancellationToken::new();
        let api = HeygenApi::new("http://127.0.0.1:9".into(), "test".into());
        let config = RetryConfig {
            attempts: 2,
            initial_delay: Duration::from_millis(1),
            ..Default::default()
        };

        let result = upload_with_retry(&api, b"audio", "audio/mpeg", &config, &cancel).await;
        assert!(matches!(result, Err(HeygenApiError::Request(_))));
    }
}
