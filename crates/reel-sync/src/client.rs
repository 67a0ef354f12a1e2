//! sync.so HTTP client: submit, poll, download.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::types::{StatusResponse, SubmitRequest, SubmitResponse};

/// Configuration for the lip-sync client.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// API base URL
    pub base_url: String,
    /// API key
    pub api_key: String,
    /// Delay between status polls
    pub poll_interval: Duration,
    /// Give up after this many polls
    pub max_polls: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl SyncConfig {
    /// Create config from environment variables.
    ///
    /// Fails when `SYNC_API_KEY` is unset.
    pub fn from_env() -> SyncResult<Self> {
        Ok(Self {
            base_url: std::env::var("SYNC_API_URL")
                .unwrap_or_else(|_| "https://api.sync.so".to_string()),
            api_key: std::env::var("SYNC_API_KEY").map_err(|_| SyncError::MissingApiKey)?,
            poll_interval: Duration::from_secs(
                std::env::var("SYNC_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            max_polls: std::env::var("SYNC_MAX_POLLS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
            timeout: Duration::from_secs(
                std::env::var("SYNC_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        })
    }
}

/// Client for the sync.so lip-sync API.
pub struct SyncClient {
    http: Client,
    config: SyncConfig,
}

impl SyncClient {
    /// Create a new lip-sync client.
    pub fn new(config: SyncConfig) -> SyncResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SyncError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> SyncResult<Self> {
        Self::new(SyncConfig::from_env()?)
    }

    /// Submit a lip-sync job for an uploaded video/audio pair.
    ///
    /// Returns the job id to poll.
    pub async fn submit(&self, video_url: &str, audio_url: &str) -> SyncResult<String> {
        let url = format!("{}/v2/generate", self.config.base_url.trim_end_matches('/'));
        let body = SubmitRequest::new(video_url, audio_url);

        debug!(video_url, audio_url, "Submitting lip-sync job");

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::SubmitFailed(format!("{}: {}", status, body)));
        }

        let submitted: SubmitResponse = response
            .json()
            .await
            .map_err(|e| SyncError::SubmitFailed(e.to_string()))?;

        info!(job_id = %submitted.id, "Lip-sync job submitted");
        Ok(submitted.id)
    }

    /// Fetch the current status of a job.
    pub async fn status(&self, job_id: &str) -> SyncResult<StatusResponse> {
        let url = format!(
            "{}/v2/generate/{}",
            self.config.base_url.trim_end_matches('/'),
            job_id
        );

        let response = self
            .http
            .get(&url)
            .header("x-api-key", &self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::JobFailed(format!(
                "status check returned {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Poll until the job completes, returning the output URL.
    ///
    /// Transient poll failures are logged and consume an attempt rather
    /// than aborting the run; a job-level `error` field is fatal.
    pub async fn wait_for_completion(&self, job_id: &str) -> SyncResult<String> {
        for attempt in 1..=self.config.max_polls {
            match self.status(job_id).await {
                Ok(status) => {
                    debug!(job_id, status = %status.status, attempt, "Lip-sync job status");

                    if let Some(error) = status.error {
                        return Err(SyncError::JobFailed(error));
                    }

                    if status.is_completed() {
                        if let Some(output_url) = status.output_url {
                            info!(job_id, "Lip-sync job completed");
                            return Ok(output_url);
                        }
                        return Err(SyncError::JobFailed(
                            "job completed without an output URL".to_string(),
                        ));
                    }
                }
                Err(e) if e.is_retryable() => {
                    warn!(job_id, attempt, error = %e, "Status poll failed, will retry");
                }
                Err(e) => return Err(e),
            }

            if attempt < self.config.max_polls {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }

        Err(SyncError::PollTimeout {
            attempts: self.config.max_polls,
        })
    }

    /// Download the finished video to a local file.
    pub async fn download(&self, output_url: &str, path: impl AsRef<Path>) -> SyncResult<()> {
        let path = path.as_ref();

        let response = self.http.get(output_url).send().await?;
        if !response.status().is_success() {
            return Err(SyncError::DownloadFailed(format!(
                "download returned {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &bytes).await?;

        info!(
            bytes = bytes.len(),
            "Lip-synced video saved to {}",
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

    fn config(base_url: String) -> SyncConfig {
        SyncConfig {
            base_url,
            api_key: "test-key".to_string(),
            poll_interval: Duration::from_millis(10),
            max_polls: 5,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_submit_returns_job_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/generate"))
            .and(header("x-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "lipsync-1.8.0"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "job-7" })),
            )
            .mount(&server)
            .await;

        let client = SyncClient::new(config(server.uri())).unwrap();
        let id = client
            .submit("https://x/v.mp4", "https://x/a.mp3")
            .await
            .unwrap();
        assert_eq!(id, "job-7");
    }

    #[tokio::test]
    async fn test_submit_error_surfaces_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad input"))
            .mount(&server)
            .await;

        let client = SyncClient::new(config(server.uri())).unwrap();
        let err = client.submit("v", "a").await.unwrap_err();
        assert!(matches!(err, SyncError::SubmitFailed(msg) if msg.contains("bad input")));
    }

    #[tokio::test]
    async fn test_wait_for_completion_polls_until_done() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/generate/job-7"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "PROCESSING" })),
            )
            .up_to_n_times(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/generate/job-7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "COMPLETED",
                "outputUrl": "https://x/final.mp4"
            })))
            .mount(&server)
            .await;

        let client = SyncClient::new(config(server.uri())).unwrap();
        let url = client.wait_for_completion("job-7").await.unwrap();
        assert_eq!(url, "https://x/final.mp4");
    }

    #[tokio::test]
    async fn test_wait_for_completion_job_error_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "FAILED",
                "error": "face not found"
            })))
            .mount(&server)
            .await;

        let client = SyncClient::new(config(server.uri())).unwrap();
        let err = client.wait_for_completion("job-7").await.unwrap_err();
        assert!(matches!(err, SyncError::JobFailed(msg) if msg.contains("face not found")));
    }

    #[tokio::test]
    async fn test_wait_for_completion_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "PROCESSING" })),
            )
            .mount(&server)
            .await;

        let client = SyncClient::new(config(server.uri())).unwrap();
        let err = client.wait_for_completion("job-7").await.unwrap_err();
        assert!(matches!(err, SyncError::PollTimeout { attempts: 5 }));
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/final.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"video".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("final/video.mp4");

        let client = SyncClient::new(config(server.uri())).unwrap();
        client
            .download(&format!("{}/final.mp4", server.uri()), &out)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), b"video");
    }
}
