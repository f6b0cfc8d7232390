use rihua_auth::{Role, TokenPair};
use rihua_core::ErrorResponse;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::model::{LoginRequest, LoginResponse, RefreshRequest, UserSummary};
use crate::modules::health::controller::{HealthResponse, InfoResponse};
use crate::modules::users::model::ProfileResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh,
        crate::modules::users::controller::get_me,
        crate::modules::health::controller::health,
        crate::modules::health::controller::info,
        crate::modules::health::controller::metrics,
    ),
    components(
        schemas(
            Role,
            TokenPair,
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            UserSummary,
            ProfileResponse,
            HealthResponse,
            InfoResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and token refresh"),
        (name = "Users", description = "Current user"),
        (name = "Operations", description = "Health, build info and metrics")
    ),
    info(
        title = "Rihua API",
        version = "0.1.0",
        description = "Community platform API. Requests authenticate with `Authorization: Bearer <access token>`.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
