//! Wire types for the sync.so generate API.

use serde::{Deserialize, Serialize};

/// Model identifier sent with every job.
pub const LIPSYNC_MODEL: &str = "lipsync-1.8.0";

/// `POST /v2/generate` request body.
#[derive(Debug, Serialize)]
pub struct SubmitRequest {
    pub model: &'static str,
    pub input: Vec<SubmitInput>,
    pub options: SubmitOptions,
}

impl SubmitRequest {
    /// Build a job for one video/audio pair.
    pub fn new(video_url: impl Into<String>, audio_url: impl Into<String>) -> Self {
        Self {
            model: LIPSYNC_MODEL,
            input: vec![
                SubmitInput {
                    kind: "video",
                    url: video_url.into(),
                },
                SubmitInput {
                    kind: "audio",
                    url: audio_url.into(),
                },
            ],
            options: SubmitOptions::default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitInput {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitOptions {
    pub output_format: &'static str,
    pub sync_mode: &'static str,
    pub fps: u32,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            output_format: "mp4",
            sync_mode: "bounce",
            fps: 30,
        }
    }
}

/// `POST /v2/generate` response body.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub id: String,
}

/// `GET /v2/generate/{id}` response body.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(rename = "outputUrl")]
    pub output_url: Option<String>,
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn is_completed(&self) -> bool {
        self.status == "COMPLETED"
    }
}
