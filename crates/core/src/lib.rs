//! Shared domain logic for the reminder pipeline.
//!
//! Pure, synchronous building blocks: script composition, voice
//! selection, media path/URL helpers, and the common error and ID
//! types used across the workspace. Everything that talks to the
//! network or the database lives in the sibling crates.

pub mod error;
pub mod media;
pub mod script;
pub mod types;
pub mod voice;
