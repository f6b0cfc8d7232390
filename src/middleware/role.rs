//! Role-based authorization.
//!
//! Two layers:
//! 1. [`authorize`], the router-wide gate evaluating the
//!    [`RoutePolicyTable`](crate::middleware::policy::RoutePolicyTable)
//! 2. [`RequireAdmin`] and [`check_any_role`] for checks inside handlers

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use rihua_auth::{Role, any_granted};
use rihua_core::AppError;
use tracing::{debug, warn};

use crate::middleware::auth::{AuthUser, RequestIdentity};
use crate::middleware::entry_point::{client_ip, forbidden_response, unauthenticated_response};
use crate::middleware::policy::Decision;
use crate::state::AppState;

/// Router-wide authorization gate.
///
/// Must run after [`resolve_identity`](crate::middleware::auth::resolve_identity);
/// a request without a resolved identity is treated as anonymous.
///
/// ```rust,ignore
/// Router::new()
///     .route("/api/v1/users/me", get(get_me))
///     .layer(middleware::from_fn_with_state(state.clone(), authorize))
///     .layer(middleware::from_fn_with_state(state.clone(), resolve_identity));
/// ```
pub async fn authorize(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let principal = req
        .extensions()
        .get::<RequestIdentity>()
        .and_then(RequestIdentity::principal);
    let decision = state
        .policy
        .decide(principal, req.method(), req.uri().path());

    match decision {
        Decision::Allow => next.run(req).await,
        Decision::Unauthenticated => {
            let ip = client_ip(
                req.headers(),
                req.extensions().get::<ConnectInfo<SocketAddr>>(),
            );
            unauthenticated_response(&state.server_config.realm, req.uri().path(), &ip)
        }
        Decision::Forbidden => {
            warn!(
                method = %req.method(),
                path = %req.uri().path(),
                subject = principal.map(|p| p.id.as_str()).unwrap_or_default(),
                "Access denied: insufficient role"
            );
            forbidden_response(req.uri().path())
        }
    }
}

/// Fails with `403` unless the user holds at least one of `allowed_roles`.
///
/// ```rust,ignore
/// pub async fn handler(auth_user: AuthUser) -> Result<Json<Response>, AppError> {
///     check_any_role(&auth_user, &[Role::Moderator, Role::Admin])?;
///     // Handler logic
/// }
/// ```
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[Role]) -> Result<(), AppError> {
    if !any_granted(auth_user.roles(), allowed_roles) {
        debug!(
            subject = %auth_user.user_id(),
            required = ?allowed_roles,
            held = ?auth_user.roles(),
            "Role check failed"
        );
        return Err(AppError::forbidden(
            "Access denied. Insufficient role for this resource.",
        ));
    }

    Ok(())
}

pub fn check_role(auth_user: &AuthUser, required_role: Role) -> Result<(), AppError> {
    check_any_role(auth_user, &[required_role])
}

/// Extractor for admin-level access (`ADMIN` or `SUPER_ADMIN`).
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_any_role(&auth_user, &[Role::Admin, Role::SuperAdmin])?;
        Ok(RequireAdmin(auth_user))
    }
}
