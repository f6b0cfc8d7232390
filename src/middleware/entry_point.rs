//! Terminal responses for requests the authorization gate turns away.
//!
//! `401` carries a `WWW-Authenticate` challenge; `403` never does, since
//! re-authenticating would not help.

use std::net::SocketAddr;

use axum::{
    Json,
    extract::ConnectInfo,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use rihua_core::ErrorResponse;
use tracing::warn;

pub const UNAUTHENTICATED_MESSAGE: &str =
    "Authentication required. Please provide a valid access token.";
pub const FORBIDDEN_MESSAGE: &str = "Access denied. Insufficient role for this resource.";

const X_XSS_PROTECTION: HeaderName = HeaderName::from_static("x-xss-protection");
const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");
const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Builds the `401` response for a request that carries no usable identity.
pub fn unauthenticated_response(realm: &str, path: &str, client_ip: &str) -> Response {
    warn!(path = %path, client_ip = %client_ip, "Unauthorized access attempt");

    let body = ErrorResponse::new(
        StatusCode::UNAUTHORIZED,
        UNAUTHENTICATED_MESSAGE,
        Some(path.to_string()),
    );
    let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();

    let headers = response.headers_mut();
    let challenge = HeaderValue::from_str(&format!("Bearer realm=\"{realm}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("Bearer"));
    headers.insert(header::WWW_AUTHENTICATE, challenge);
    insert_security_headers(headers);

    response
}

/// Builds the `403` response for an identified caller without a required role.
pub fn forbidden_response(path: &str) -> Response {
    let body = ErrorResponse::new(StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE, Some(path.to_string()));
    let mut response = (StatusCode::FORBIDDEN, Json(body)).into_response();
    insert_security_headers(response.headers_mut());
    response
}

fn insert_security_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
}

/// Best-effort client address: first `X-Forwarded-For` hop, then `X-Real-IP`,
/// then the socket peer, else `unknown`.
pub fn client_ip(headers: &HeaderMap, peer: Option<&ConnectInfo<SocketAddr>>) -> String {
    let header_value = |name: &HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(first) = header_value(&X_FORWARDED_FOR)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return first.to_string();
    }

    if let Some(real_ip) = header_value(&X_REAL_IP) {
        return real_ip.to_string();
    }

    peer.map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
