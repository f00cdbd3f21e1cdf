use axum::response::Json;
use tracing::instrument;

use crate::schemas::HealthResponse;

/// Health check endpoint. Does not require a session.
#[instrument]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "ALMID System is running".to_string(),
    })
}
