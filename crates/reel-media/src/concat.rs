//! Clip concatenation with tail trimming.
//!
//! The sequencer's plan is turned into one continuous video via the
//! FFmpeg concat demuxer. When the plan overshoots the target duration,
//! the output is capped with `-t` so the tail is cut to match the audio
//! exactly.

use std::path::Path;
use tracing::info;

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};
use crate::sequence::{SequencePlan, DURATION_EPSILON};

/// Render a sequence plan into a single video file.
///
/// `target_duration` is the audio length the output must match; it is
/// applied as the output duration cap whenever the plan carries excess.
pub async fn concat_clips(
    plan: &SequencePlan,
    target_duration: f64,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let output = output.as_ref();

    if plan.clips.is_empty() {
        return Err(MediaError::no_clips("sequence plan has no clips"));
    }

    let list_dir = tempfile::tempdir()?;
    let list_path = list_dir.path().join("concat.txt");
    tokio::fs::write(&list_path, concat_list(plan)).await?;

    let mut cmd = FfmpegCommand::new(&list_path, output)
        .concat_demuxer()
        .codec_copy();

    if plan.excess_duration > DURATION_EPSILON {
        cmd = cmd.limit_duration(target_duration);
    }

    cmd.run().await?;

    info!(
        clips = plan.clips.len(),
        total = plan.total_duration,
        trimmed = plan.excess_duration,
        "Concatenated background video: {}",
        output.display()
    );
    Ok(())
}

/// Build the concat-demuxer list file contents.
///
/// Single quotes in paths are escaped per the demuxer's quoting rules
/// (`'` closes the string, `\'` emits the quote, `'` reopens it).
fn concat_list(plan: &SequencePlan) -> String {
    let mut list = String::new();
    for clip in &plan.clips {
        let path = clip.path().to_string_lossy().replace('\'', "'\\''");
        list.push_str(&format!("file '{}'\n", path));
    }
    list
}
