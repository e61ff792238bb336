//! Avatar-video provider client.
//!
//! Wraps the HeyGen HTTP API (asset upload, video generation, status
//! polling, result download) and drives a full render from voice input
//! to a downloaded MP4 under the media directory.

pub mod api;
pub mod generator;
pub mod retry;

pub use api::{HeygenApi, HeygenApiError, VideoStatus, VoiceInput};
pub use generator::{GeneratorConfig, HeygenError, RenderedVideo, VideoGenerator, VoiceSource};
pub use retry::RetryConfig;
