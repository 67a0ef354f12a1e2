//! Application state.

use std::sync::Arc;

use reel_pipeline::{Pipeline, PipelineConfig};
use reel_storage::S3Client;
use reel_sync::SyncClient;
use reel_voice::VoiceClient;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<Pipeline>,
    pub pipeline_config: PipelineConfig,
}

impl AppState {
    /// Create new application state.
    ///
    /// Builds all three external clients from the environment, so a
    /// missing API key fails fast at startup rather than on the first
    /// request.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let voice = VoiceClient::from_env()?;
        let storage = S3Client::from_env().await?;
        let sync = SyncClient::from_env()?;
        let pipeline_config = PipelineConfig::from_env();

        let pipeline = Pipeline::new(pipeline_config.clone(), voice, storage, sync);

        Ok(Self {
            config,
            pipeline: Arc::new(pipeline),
            pipeline_config,
        })
    }
}
