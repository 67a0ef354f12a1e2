//! ElevenLabs text-to-speech HTTP client.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{VoiceError, VoiceResult};

/// Configuration for the voice client.
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Text-to-speech API base URL
    pub base_url: String,
    /// API key
    pub api_key: String,
    /// Default voice to synthesize with
    pub voice_id: String,
    /// Request timeout
    pub timeout: Duration,
}

impl VoiceConfig {
    /// Create config from environment variables.
    ///
    /// Fails when `ELEVENLABS_API_KEY` is unset so a misconfigured
    /// deployment is caught at startup rather than per request.
    pub fn from_env() -> VoiceResult<Self> {
        Ok(Self {
            base_url: std::env::var("ELEVENLABS_API_URL")
                .unwrap_or_else(|_| "https://api.elevenlabs.io/v1/text-to-speech".to_string()),
            api_key: std::env::var("ELEVENLABS_API_KEY")
                .map_err(|_| VoiceError::MissingApiKey)?,
            voice_id: std::env::var("ELEVENLABS_VOICE_ID")
                .unwrap_or_else(|_| "K1zEUenwO6XnzLVQdgEp".to_string()),
            timeout: Duration::from_secs(
                std::env::var("ELEVENLABS_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
        })
    }
}

/// Synthesis request body.
#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'static str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f64,
    similarity_boost: f64,
    style: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.4,
            similarity_boost: 0.75,
            style: 0.2,
        }
    }
}

/// Client for the ElevenLabs text-to-speech API.
pub struct VoiceClient {
    http: Client,
    config: VoiceConfig,
}

impl VoiceClient {
    /// Create a new voice client.
    pub fn new(config: VoiceConfig) -> VoiceResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(VoiceError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> VoiceResult<Self> {
        Self::new(VoiceConfig::from_env()?)
    }

    /// The configured default voice.
    pub fn default_voice(&self) -> &str {
        &self.config.voice_id
    }

    /// Synthesize `text` into MP3 bytes with the given voice.
    pub async fn synthesize(&self, text: &str, voice_id: &str) -> VoiceResult<Vec<u8>> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), voice_id);

        debug!(voice_id, chars = text.len(), "Requesting speech synthesis");

        let body = SynthesisRequest {
            text,
            model_id: "eleven_multilingual_v2",
            voice_settings: VoiceSettings::default(),
        };

        let response = self
            .http
            .post(&url)
            .header("xi-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::RequestFailed { status, body });
        }

        let audio = response.bytes().await?.to_vec();
        if audio.is_empty() {
            return Err(VoiceError::EmptyAudio);
        }

        Ok(audio)
    }

    /// Synthesize `text` and write the MP3 to `path`.
    pub async fn synthesize_to_file(
        &self,
        text: &str,
        voice_id: &str,
        path: impl AsRef<Path>,
    ) -> VoiceResult<()> {
        let path = path.as_ref();
        let audio = self.synthesize(text, voice_id).await?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &audio).await?;

        info!(
            bytes = audio.len(),
            "Audio file saved at {}",
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> VoiceConfig {
        VoiceConfig {
            base_url,
            api_key: "test-key".to_string(),
            voice_id: "voice-1".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_synthesize_returns_audio_bytes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/voice-1"))
            .and(header("xi-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "model_id": "eleven_multilingual_v2",
                "voice_settings": { "stability": 0.4 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3data".to_vec()))
            .mount(&server)
            .await;

        let client = VoiceClient::new(config(server.uri())).unwrap();
        let audio = client.synthesize("hello", "voice-1").await.unwrap();
        assert_eq!(audio, b"mp3data");
    }

    #[tokio::test]
    async fn test_synthesize_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let client = VoiceClient::new(config(server.uri())).unwrap();
        let err = client.synthesize("hello", "voice-1").await.unwrap_err();
        assert!(matches!(err, VoiceError::RequestFailed { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_synthesize_to_file_writes_audio() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3data".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio/output.mp3");

        let client = VoiceClient::new(config(server.uri())).unwrap();
        client
            .synthesize_to_file("hello", "voice-1", &out)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), b"mp3data");
    }

    #[tokio::test]
    async fn test_empty_audio_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = VoiceClient::new(config(server.uri())).unwrap();
        let err = client.synthesize("hello", "voice-1").await.unwrap_err();
        assert!(matches!(err, VoiceError::EmptyAudio));
    }
}
