//! Text-to-speech client producing temporary audio files.
//!
//! [`SpeechClient::synthesize`] renders a script into an MP3 in the
//! scratch directory and hands back an [`AudioFile`] guard that deletes
//! the file when dropped, so the audio never outlives its upload.

mod audio;
mod client;

pub use audio::AudioFile;
pub use client::{SpeechClient, SpeechError};
