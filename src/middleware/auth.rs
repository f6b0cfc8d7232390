//! Request identity resolution.
//!
//! [`resolve_identity`] runs once per request, before authorization. It never
//! rejects a request: the outcome is always either an identified
//! [`Principal`] or anonymous, stored as a [`RequestIdentity`] in the
//! request's extensions. Handlers read it back through [`AuthUser`] or by
//! extracting [`RequestIdentity`] directly.

use std::convert::Infallible;
use std::panic::{self, AssertUnwindSafe};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use rihua_auth::{Claims, DecodeError, Principal, Role};
use rihua_core::AppError;
use rihua_observability::track_identity_resolution;
use tracing::{debug, error};

use crate::state::AppState;

/// Path prefixes that skip resolution and always proceed as anonymous.
pub const EXEMPT_PREFIXES: [&str; 6] = [
    "/api/v1/auth/",
    "/actuator/health",
    "/actuator/info",
    "/api-docs",
    "/swagger-ui",
    "/scalar",
];

/// Paths that skip resolution only on an exact match.
pub const EXEMPT_PATHS: [&str; 2] = ["/favicon.ico", "/error"];

const BEARER_PREFIX: &str = "Bearer ";

/// Identity resolved for the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestIdentity {
    #[default]
    Anonymous,
    Authenticated(Principal),
}

impl RequestIdentity {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            RequestIdentity::Authenticated(principal) => Some(principal),
            RequestIdentity::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal().is_some()
    }
}

/// Why a request ended up anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnonymousReason {
    /// No `Authorization: Bearer` credential
    NoCredentials,
    InvalidToken(DecodeError),
    /// Verified, but a refresh token or an unknown kind
    NotAccessToken,
    /// Resolution panicked
    Internal,
}

impl AnonymousReason {
    /// Metric label.
    pub fn outcome(&self) -> &'static str {
        match self {
            AnonymousReason::NoCredentials => "anonymous",
            AnonymousReason::InvalidToken(_) => "invalid",
            AnonymousReason::NotAccessToken => "refresh_rejected",
            AnonymousReason::Internal => "internal_error",
        }
    }
}

pub fn is_exempt(path: &str) -> bool {
    EXEMPT_PATHS.contains(&path) || EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Token carried by an `Authorization` header with the exact, case-sensitive
/// `Bearer ` prefix. Any other scheme, or a blank token, yields `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves a principal from request headers.
///
/// `verify` is only invoked when a bearer token was found. Only a verified
/// access token yields a principal.
pub fn resolve_from_headers<F>(
    headers: &HeaderMap,
    verify: F,
    default_language: &str,
) -> Result<Principal, AnonymousReason>
where
    F: FnOnce(&str) -> Result<Claims, DecodeError>,
{
    let token = bearer_token(headers).ok_or(AnonymousReason::NoCredentials)?;
    let claims = verify(token).map_err(AnonymousReason::InvalidToken)?;
    Principal::from_access_claims(claims, default_language).ok_or(AnonymousReason::NotAccessToken)
}

/// [`resolve_from_headers`] with panics contained: a panic while verifying
/// leaves the request anonymous with [`AnonymousReason::Internal`].
pub fn resolve_guarded<F>(
    headers: &HeaderMap,
    verify: F,
    default_language: &str,
) -> Result<Principal, AnonymousReason>
where
    F: FnOnce(&str) -> Result<Claims, DecodeError>,
{
    panic::catch_unwind(AssertUnwindSafe(|| {
        resolve_from_headers(headers, verify, default_language)
    }))
    .unwrap_or(Err(AnonymousReason::Internal))
}

pub async fn resolve_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = if is_exempt(req.uri().path()) {
        RequestIdentity::Anonymous
    } else {
        let validator = &state.validator;
        let default_language = state.server_config.default_language.as_str();

        let resolved =
            resolve_guarded(req.headers(), |token| validator.check(token), default_language);
        if matches!(resolved, Err(AnonymousReason::Internal)) {
            error!(
                path = %req.uri().path(),
                "Identity resolution panicked; continuing as anonymous"
            );
        }

        match resolved {
            Ok(principal) => {
                track_identity_resolution("identified");
                debug!(subject = %principal.id, "Resolved request identity");
                RequestIdentity::Authenticated(principal)
            }
            Err(reason) => {
                track_identity_resolution(reason.outcome());
                debug!(outcome = reason.outcome(), "Request proceeds as anonymous");
                RequestIdentity::Anonymous
            }
        }
    };

    req.extensions_mut().insert(identity);
    next.run(req).await
}

impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Extractor for handlers that require an identified caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn user_id(&self) -> &str {
        &self.0.id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn roles(&self) -> &[Role] {
        &self.0.roles
    }

    pub fn language(&self) -> &str {
        &self.0.language
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<RequestIdentity>() {
            Some(RequestIdentity::Authenticated(principal)) => Ok(AuthUser(principal.clone())),
            _ => Err(AppError::unauthorized("Authentication required")),
        }
    }
}
