//! Shared data models for the Reelsync backend.
//!
//! This crate provides Serde-serializable types for:
//! - Pipeline job identifiers
//! - Generation request/response payloads

pub mod generate;
pub mod job;

pub use generate::{GenerateRequest, GenerateResponse};
pub use job::JobId;
