//! Client for the sync.so lip-sync API.
//!
//! The pipeline uploads its assets, submits a generate job with both
//! URLs, polls until the job completes, and downloads the result. This
//! crate wraps those three calls.

pub mod client;
pub mod error;
pub mod types;

pub use client::{SyncClient, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use types::{StatusResponse, SubmitRequest, LIPSYNC_MODEL};
