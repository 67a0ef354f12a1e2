//! High-level storage operations for pipeline assets.

use std::path::Path;

use reel_models::JobId;

use crate::client::S3Client;
use crate::error::StorageResult;

impl S3Client {
    /// Upload a job's background video, returning its public URL.
    pub async fn upload_job_video(
        &self,
        path: impl AsRef<Path>,
        job_id: &JobId,
    ) -> StorageResult<String> {
        let key = video_key(job_id);
        self.upload_file(path, &key, "video/mp4").await?;
        Ok(self.public_url(&key))
    }

    /// Upload a job's synthesized audio, returning its public URL.
    pub async fn upload_job_audio(
        &self,
        path: impl AsRef<Path>,
        job_id: &JobId,
    ) -> StorageResult<String> {
        let key = audio_key(job_id);
        self.upload_file(path, &key, "audio/mpeg").await?;
        Ok(self.public_url(&key))
    }
}

/// Object key for a job's background video.
pub fn video_key(job_id: &JobId) -> String {
    format!("video/{}.mp4", job_id)
}

/// Object key for a job's synthesized audio.
pub fn audio_key(job_id: &JobId) -> String {
    format!("audio/{}.mp3", job_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_keys() {
        let job_id = JobId::from_string("abc");
        assert_eq!(video_key(&job_id), "video/abc.mp4");
        assert_eq!(audio_key(&job_id), "audio/abc.mp3");
    }
}
