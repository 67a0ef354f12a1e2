//! Pipeline configuration.

use std::path::PathBuf;

/// Filesystem and clip-selection settings for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory holding one subdirectory per clip environment
    pub clips_root: PathBuf,
    /// Directory for per-job working files and final outputs
    pub work_dir: PathBuf,
    /// Pin every run to this environment instead of picking at random
    pub environment: Option<String>,
}

impl PipelineConfig {
    /// Create config from environment variables, with local-dev defaults.
    pub fn from_env() -> Self {
        Self {
            clips_root: std::env::var("CLIPS_ROOT")
                .unwrap_or_else(|_| "public/clips".to_string())
                .into(),
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "output".to_string())
                .into(),
            environment: std::env::var("CLIP_ENVIRONMENT").ok().filter(|s| !s.is_empty()),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clips_root: PathBuf::from("public/clips"),
            work_dir: PathBuf::from("output"),
            environment: None,
        }
    }
}
