//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    /// A clip's duration could not be resolved. Recoverable: the
    /// sequencer skips the clip and draws a new candidate.
    #[error("Could not determine duration of {path}: {reason}")]
    DurationProbeFailed { path: PathBuf, reason: String },

    /// The clip pool has no usable clips left. Fatal for the run.
    #[error("No clips available: {0}")]
    NoClipsAvailable(String),

    /// Target duration is zero or negative. Fatal, rejected up front.
    #[error("Target duration must be positive")]
    ZeroTargetDuration,

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid media file: {0}")]
    InvalidMedia(String),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a duration probe failure for a clip.
    pub fn probe_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DurationProbeFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a no-clips-available error.
    pub fn no_clips(message: impl Into<String>) -> Self {
        Self::NoClipsAvailable(message.into())
    }
}
