//! Lip-sync client error types.

use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("SYNC_API_KEY not set")]
    MissingApiKey,

    #[error("Job submission failed: {0}")]
    SubmitFailed(String),

    #[error("Lip-sync job failed: {0}")]
    JobFailed(String),

    #[error("Job did not complete within {attempts} polls")]
    PollTimeout { attempts: u32 },

    #[error("Result download failed: {0}")]
    DownloadFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Transient errors worth retrying within the poll budget.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Network(_))
    }
}
