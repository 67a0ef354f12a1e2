//! The script-to-video pipeline.
//!
//! One run covers five steps: synthesize the narration, sequence
//! background clips to the narration's length, assemble them, upload
//! both assets, then lip-sync and download the final video.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, instrument};

use reel_media::{concat_clips, probe_duration, sequence, ClipPool, MediaError};
use reel_models::JobId;
use reel_storage::S3Client;
use reel_sync::SyncClient;
use reel_voice::VoiceClient;

use crate::config::PipelineConfig;
use crate::error::PipelineResult;

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub job_id: JobId,
    /// Local path of the final lip-synced video
    pub video_path: PathBuf,
    /// Public URL of the uploaded background video
    pub video_url: String,
    /// Public URL of the uploaded narration audio
    pub audio_url: String,
    /// Narration length in seconds, which the video matches
    pub audio_duration: f64,
}

/// Pipeline orchestrator holding the three external clients.
pub struct Pipeline {
    config: PipelineConfig,
    voice: VoiceClient,
    storage: S3Client,
    sync: SyncClient,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        voice: VoiceClient,
        storage: S3Client,
        sync: SyncClient,
    ) -> Self {
        Self {
            config,
            voice,
            storage,
            sync,
        }
    }

    /// Storage client, exposed for readiness checks.
    pub fn storage(&self) -> &S3Client {
        &self.storage
    }

    /// Run the full pipeline for one script.
    ///
    /// `voice_id` overrides the configured default voice when given.
    #[instrument(skip_all, fields(job_id))]
    pub async fn run(&self, script: &str, voice_id: Option<&str>) -> PipelineResult<PipelineOutput> {
        let job_id = JobId::new();
        tracing::Span::current().record("job_id", job_id.as_str());

        let job_dir = self.config.work_dir.join(job_id.as_str());
        tokio::fs::create_dir_all(&job_dir).await?;

        // Step 1: narration.
        let voice = voice_id.unwrap_or_else(|| self.voice.default_voice());
        let audio_path = job_dir.join("audio.mp3");
        info!(voice, chars = script.len(), "Synthesizing narration");
        self.voice
            .synthesize_to_file(script, voice, &audio_path)
            .await?;

        // The narration's length is the target for everything downstream.
        // An audio file we cannot measure gives us no target to cut to.
        let target_duration = probe_duration(&audio_path).await.map_err(|e| match e {
            MediaError::DurationProbeFailed { .. } => MediaError::ZeroTargetDuration,
            other => other,
        })?;
        info!(target_duration, "Narration synthesized");

        // Step 2: clip sequencing.
        let pool = ClipPool::scan(&self.config.clips_root)?;
        let mut rng = StdRng::from_os_rng();
        let environment = match &self.config.environment {
            Some(pinned) => pinned.clone(),
            None => pool.choose_environment(&mut rng).to_string(),
        };
        let source = pool.open(&environment)?;

        let plan = sequence(target_duration, &source, &mut rng).await?;
        info!(
            environment,
            clips = plan.clips.len(),
            total_duration = plan.total_duration,
            excess_duration = plan.excess_duration,
            "Clip sequence planned"
        );

        // Step 3: assembly.
        let background_path = job_dir.join("background.mp4");
        concat_clips(&plan, target_duration, &background_path).await?;

        // Step 4: uploads.
        let video_url = self
            .storage
            .upload_job_video(&background_path, &job_id)
            .await?;
        let audio_url = self.storage.upload_job_audio(&audio_path, &job_id).await?;
        info!(video_url, audio_url, "Assets uploaded");

        // Step 5: lip-sync.
        let sync_job = self.sync.submit(&video_url, &audio_url).await?;
        let output_url = self.sync.wait_for_completion(&sync_job).await?;

        let video_path = job_dir.join("final.mp4");
        self.sync.download(&output_url, &video_path).await?;

        info!(path = %video_path.display(), "Pipeline run complete");

        Ok(PipelineOutput {
            job_id,
            video_path,
            video_url,
            audio_url,
            audio_duration: target_duration,
        })
    }
}
