//! Maintenance handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use reel_pipeline::clear_work_dir;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CleanupResponse {
    pub success: bool,
    /// Number of top-level entries removed from the working directory.
    pub removed: u64,
}

/// `POST /cleanup` — wipe the working directory of finished job output.
pub async fn cleanup_output(State(state): State<AppState>) -> ApiResult<Json<CleanupResponse>> {
    let removed = clear_work_dir(&state.pipeline_config.work_dir).await?;
    info!(removed, "Output cleanup requested");
    Ok(Json(CleanupResponse {
        success: true,
        removed,
    }))
}
