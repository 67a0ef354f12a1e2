//! FFmpeg CLI wrapper and background clip sequencing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Duration probing via FFprobe
//! - The clip sequencer: random, non-repeating, angle-alternating
//!   selection of background clips to match a target duration
//! - Concat-demuxer assembly with tail trimming

pub mod command;
pub mod concat;
pub mod error;
pub mod probe;
pub mod sequence;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand};
pub use concat::concat_clips;
pub use error::{MediaError, MediaResult};
pub use probe::{probe_duration, probe_media, MediaInfo};
pub use sequence::{
    sequence, Angle, ClipPool, ClipRef, ClipSource, DirClipSource, SequencePlan,
};
