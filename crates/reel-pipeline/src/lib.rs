//! Orchestration of the script-to-video pipeline.
//!
//! Ties the voice, media, storage and lip-sync crates together into a
//! single [`Pipeline::run`] call, and owns the working-directory layout.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod workdir;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{Pipeline, PipelineOutput};
pub use workdir::clear_work_dir;
