//! Typed environment configuration for the batch worker.
//!
//! Read once at startup; every service client is built from this and
//! lives for one batch run. Nothing here is process-global.

use std::path::PathBuf;
use std::time::Duration;

use emivid_translate::TranslatorConfig;

/// Days before the due date a reminder goes out.
const DEFAULT_LEAD_DAYS: u64 = 3;
/// Seconds between render status polls.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
/// Wall-clock budget for one render.
const DEFAULT_VIDEO_TIMEOUT_SECS: u64 = 600;
/// Asset upload attempts before giving up.
const DEFAULT_UPLOAD_RETRY_ATTEMPTS: u32 = 3;

const DEFAULT_HEYGEN_API_URL: &str = "https://api.heygen.com";
const DEFAULT_AVATAR_ID: &str = "Abigail_expressive_2024112501";
const DEFAULT_TTS_API_URL: &str = "https://api.elevenlabs.io";
const DEFAULT_TRANSLATE_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TRANSLATE_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {name}")]
    Missing { name: &'static str },

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Everything the worker binary reads from the environment.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,

    pub heygen_api_url: String,
    pub heygen_api_key: String,
    pub avatar_id: String,

    pub tts_api_url: String,
    pub tts_api_key: String,

    pub translate: TranslatorConfig,

    /// Root of the local media tree where videos land.
    pub media_dir: PathBuf,
    /// Public prefix the media tree is served under.
    pub media_url_prefix: String,
    /// Directory for temporary audio files.
    pub scratch_dir: PathBuf,

    pub lead_days: u64,
    pub poll_interval: Duration,
    pub video_timeout: Duration,
    pub upload_retry_attempts: u32,
}

impl WorkerConfig {
    /// Build the config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,

            heygen_api_url: optional("HEYGEN_API_URL", DEFAULT_HEYGEN_API_URL),
            heygen_api_key: required("HEYGEN_API_KEY")?,
            avatar_id: optional("HEYGEN_AVATAR_ID", DEFAULT_AVATAR_ID),

            tts_api_url: optional("TTS_API_URL", DEFAULT_TTS_API_URL),
            tts_api_key: required("TTS_API_KEY")?,

            translate: translator_from_env(),

            media_dir: PathBuf::from(optional("MEDIA_DIR", "media")),
            media_url_prefix: optional("MEDIA_URL_PREFIX", "http://localhost:8000/media"),
            scratch_dir: PathBuf::from(optional("SCRATCH_DIR", ".")),

            lead_days: parse("REMINDER_LEAD_DAYS", DEFAULT_LEAD_DAYS)?,
            poll_interval: Duration::from_secs(parse(
                "VIDEO_POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL_SECS,
            )?),
            video_timeout: Duration::from_secs(parse(
                "VIDEO_TIMEOUT_SECS",
                DEFAULT_VIDEO_TIMEOUT_SECS,
            )?),
            upload_retry_attempts: parse(
                "UPLOAD_RETRY_ATTEMPTS",
                DEFAULT_UPLOAD_RETRY_ATTEMPTS,
            )?,
        })
    }
}

/// Translation backend from env: configured key enables the
/// chat-completion backend, absence disables translation entirely.
fn translator_from_env() -> TranslatorConfig {
    match std::env::var("TRANSLATE_API_KEY") {
        Ok(api_key) if !api_key.trim().is_empty() => TranslatorConfig::ChatCompletion {
            api_url: optional("TRANSLATE_API_URL", DEFAULT_TRANSLATE_API_URL),
            api_key,
            model: optional("TRANSLATE_MODEL", DEFAULT_TRANSLATE_MODEL),
        },
        _ => TranslatorConfig::Disabled,
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing { name })
}

fn optional(name: &'static str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw.clone(),
        }),
        Err(_) => Ok(default),
    }
}
