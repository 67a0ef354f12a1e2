//! ElevenLabs text-to-speech client.
//!
//! Thin HTTP wrapper: the script goes in, MP3 bytes come out. Voice
//! settings match the production preset used for narration.

pub mod client;
pub mod error;

pub use client::{VoiceClient, VoiceConfig};
pub use error::{VoiceError, VoiceResult};
