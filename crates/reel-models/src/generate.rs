//! Request/response payloads for the generation endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::JobId;

/// Maximum accepted script length in characters.
///
/// ElevenLabs rejects very long inputs anyway; capping here gives the
/// caller a 400 instead of a late 500 from the TTS provider.
pub const MAX_SCRIPT_CHARS: u64 = 5000;

/// Body of `POST /generate`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateRequest {
    /// The script to speak and lip-sync.
    #[validate(length(min = 1, max = 5000, message = "script must be 1-5000 characters"))]
    pub script: String,

    /// Optional voice override; falls back to the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
}

/// Response of `POST /generate` on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    /// The run that produced the video.
    pub job_id: JobId,
    /// Local path of the final lip-synced video.
    pub video_path: String,
    /// Public URL of the uploaded background video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_script_rejected() {
        let req = GenerateRequest {
            script: String::new(),
            voice_id: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_normal_script_accepted() {
        let req = GenerateRequest {
            script: "You know noah solomon has always been a fine fellow".to_string(),
            voice_id: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_overlong_script_rejected() {
        let req = GenerateRequest {
            script: "x".repeat(MAX_SCRIPT_CHARS as usize + 1),
            voice_id: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_voice_id_omitted_from_json() {
        let req = GenerateRequest {
            script: "hi".to_string(),
            voice_id: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("voice_id"));
    }
}
