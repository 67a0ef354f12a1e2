//! S3 storage client for pipeline assets.
//!
//! This crate provides:
//! - File upload with public-read access (the lip-sync service fetches
//!   assets by URL)
//! - Public URL construction
//! - Bucket connectivity checks

pub mod client;
pub mod error;
pub mod operations;

pub use client::{S3Client, S3Config};
pub use error::{StorageError, StorageResult};
pub use operations::{audio_key, video_key};
