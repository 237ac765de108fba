//! Health check handler.

use crate::models::HealthResponse;
use axum::Json;
use tracing::instrument;

/// Handler for `GET /health`.
///
/// Public liveness probe. The service holds no external connections that
/// could degrade, so a reachable process is a healthy one.
#[instrument(skip_all, name = "agency.health.check")]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
