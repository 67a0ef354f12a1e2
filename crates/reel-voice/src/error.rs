//! Voice synthesis error types.

use thiserror::Error;

pub type VoiceResult<T> = Result<T, VoiceError>;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("ELEVENLABS_API_KEY not set")]
    MissingApiKey,

    #[error("TTS request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("TTS returned an empty audio body")]
    EmptyAudio,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
