use axum::Json;
use rihua_core::{AppError, ErrorResponse};
use tracing::instrument;

use super::model::ProfileResponse;
use crate::middleware::auth::AuthUser;

/// Current user profile, taken from the access token
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "Missing, invalid or non-access token", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument]
pub async fn get_me(auth_user: AuthUser) -> Result<Json<ProfileResponse>, AppError> {
    let AuthUser(principal) = auth_user;
    Ok(Json(ProfileResponse {
        id: principal.id,
        email: principal.email,
        roles: principal.roles,
        language: principal.language,
    }))
}
