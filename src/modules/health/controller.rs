use axum::{Json, extract::State, http::header, response::IntoResponse};
use rihua_core::{AppError, ErrorResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::middleware::role::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `UP` while the process serves requests
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/actuator/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "Operations"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP".to_string(),
    })
}

/// Build information
#[utoipa::path(
    get,
    path = "/actuator/info",
    responses((status = 200, description = "Service name and version", body = InfoResponse)),
    tag = "Operations"
)]
pub async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Prometheus metrics in text exposition format
#[utoipa::path(
    get,
    path = "/actuator/metrics",
    responses(
        (
            status = 200,
            description = "Prometheus text exposition",
            body = String,
            content_type = "text/plain"
        ),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 503, description = "Metrics recorder not installed", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Operations"
)]
pub async fn metrics(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable("Metrics are not enabled"))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
