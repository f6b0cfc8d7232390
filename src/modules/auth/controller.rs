use axum::Json;
use axum::extract::State;
use rihua_auth::TokenPair;
use rihua_core::{AppError, ErrorResponse};
use tracing::instrument;

use super::model::{LoginRequest, LoginResponse, RefreshRequest};
use super::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Login and receive an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state, dto).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 401, description = "Invalid, expired or non-refresh token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let tokens = AuthService::refresh(&state, dto).await?;
    Ok(Json(tokens))
}
