//! Axum HTTP API server.
//!
//! Exposes the generation pipeline over HTTP: one `POST /generate`
//! endpoint that runs a full script-to-video job, plus health and
//! maintenance routes.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
