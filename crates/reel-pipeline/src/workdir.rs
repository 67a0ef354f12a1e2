//! Working-directory maintenance.

use std::path::Path;

use tracing::info;

use crate::error::PipelineResult;

/// Remove everything inside the working directory.
///
/// The directory itself is kept (and created when missing) so the next
/// job can write into it immediately. Intended for startup cleanup and
/// the maintenance endpoint, not for per-job teardown.
pub async fn clear_work_dir(dir: impl AsRef<Path>) -> PipelineResult<u64> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;

    let mut removed = 0u64;
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            tokio::fs::remove_dir_all(&path).await?;
        } else {
            tokio::fs::remove_file(&path).await?;
        }
        removed += 1;
    }

    info!(removed, "Cleared working directory {}", dir.display());
    Ok(removed)
}
