//! Video generation handler.

use axum::extract::State;
use axum::Json;
use tracing::{error, info};
use validator::Validate;

use reel_models::{GenerateRequest, GenerateResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `POST /generate` — run the full pipeline for one script.
///
/// Synchronous from the client's point of view: the response arrives
/// once the lip-synced video has been downloaded.
pub async fn generate_video(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    info!(chars = request.script.len(), "Generation requested");

    let output = state
        .pipeline
        .run(&request.script, request.voice_id.as_deref())
        .await
        .map_err(|e| {
            error!(error = %e, "Pipeline run failed");
            e
        })?;

    Ok(Json(GenerateResponse {
        success: true,
        job_id: output.job_id,
        video_path: output.video_path.display().to_string(),
        video_url: Some(output.video_url),
    }))
}
