use axum::http::{HeaderValue, Uri, header};
use axum::{Router, middleware};
use rihua_core::AppError;
use rihua_observability::{logging_middleware, metrics_middleware};
use tower_http::set_header::SetResponseHeaderLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::middleware::auth::resolve_identity;
use crate::middleware::role::authorize;
use crate::modules::auth::router::init_auth_router;
use crate::modules::health::router::init_health_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

/// One year, subdomains included.
const HSTS_POLICY: &str = "max-age=31536000; includeSubDomains";

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("No route for {}", uri.path()))
}

/// Builds the application router.
///
/// Layers run outermost first: request logging, metrics, security headers,
/// identity resolution, then the authorization gate.
pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/actuator", init_health_router())
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/users", init_users_router()),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), authorize))
        .layer(middleware::from_fn_with_state(state.clone(), resolve_identity))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_POLICY),
        ))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
