//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors surfaced by a generation run.
///
/// Each stage's error converts via `#[from]`, so the pipeline body is
/// plain `?` propagation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Voice synthesis failed: {0}")]
    Voice(#[from] reel_voice::VoiceError),

    #[error("Media processing failed: {0}")]
    Media(#[from] reel_media::MediaError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] reel_storage::StorageError),

    #[error("Lip-sync failed: {0}")]
    Sync(#[from] reel_sync::SyncError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// True when the failure was caused by the caller's input rather
    /// than the pipeline or its collaborators.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PipelineError::Media(reel_media::MediaError::ZeroTargetDuration)
        )
    }
}
