//! Media path and URL helpers.
//!
//! Downloaded reminder videos are stored under a media directory and
//! served under a configured public URL prefix. A reminder row may hold
//! either an absolute provider URL or a path relative to the media
//! root; [`resolve_public_url`] turns both into something a browser can
//! load.

use crate::error::CoreError;

/// Subdirectory of the media root where reminder videos land.
pub const REMINDER_MEDIA_SUBDIR: &str = "reminders";

/// Relative media path for a rendered video, keyed by provider video ID.
pub fn video_relative_path(video_id: &str) -> String {
    format!("{REMINDER_MEDIA_SUBDIR}/{video_id}.mp4")
}

/// Resolve a stored video reference to a public URL.
///
/// Absolute `http(s)` URLs pass through untouched; anything else is
/// treated as a path relative to `media_url_prefix`. Slashes at the
/// join point are normalized so the result never contains `//`.
pub fn resolve_public_url(media_url_prefix: &str, stored: &str) -> String {
    if stored.starts_with("http://") || stored.starts_with("https://") {
        return stored.to_string();
    }
    format!(
        "{}/{}",
        media_url_prefix.trim_end_matches('/'),
        stored.trim_start_matches('/'),
    )
}

/// Validate that a download URL is non-empty and starts with `http`.
pub fn validate_download_url(url: &str) -> Result<(), CoreError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Download URL must not be empty".to_string(),
        ));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(CoreError::Validation(format!(
            "Download URL must start with http:// or https://, got: '{trimmed}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_passes_through() {
        assert_eq!(
            resolve_public_url("https://media.example.com", "https://cdn.heygen.com/v/abc.mp4"),
            "https://cdn.heygen.com/v/abc.mp4"
        );
    }

    #[test]
    fn relative_path_joins_prefix() {
        assert_eq!(
            resolve_public_url("https://media.example.com", "reminders/abc.mp4"),
            "https://media.example.com/reminders/abc.mp4"
        );
    }

    #[test]
    fn join_normalizes_slashes() {
        assert_eq!(
            resolve_public_url("https://media.example.com/", "/reminders/abc.mp4"),
            "https://media.example.com/reminders/abc.mp4"
        );
    }

    #[test]
    fn video_path_is_keyed_by_video_id() {
        assert_eq!(video_relative_path("vid-42"), "reminders/vid-42.mp4");
    }

    #[test]
    fn download_url_validation() {
        assert!(validate_download_url("https://cdn.example.com/a.mp4").is_ok());
        assert!(validate_download_url("").is_err());
        assert!(validate_download_url("ftp://nope").is_err());
    }
}
