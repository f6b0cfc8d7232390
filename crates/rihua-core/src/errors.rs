//! Application error type and the error body shared by every failing response.
//!
//! All user-visible failures are rendered as an [`ErrorResponse`]:
//!
//! ```json
//! {
//!   "timestamp": "2025-01-01T12:00:00.000Z",
//!   "status": 401,
//!   "error": "UNAUTHORIZED",
//!   "message": "Invalid email or password",
//!   "path": "/api/v1/auth/login"
//! }
//! ```
//!
//! Server errors never echo their internal cause; it is logged instead.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Fixed-shape error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// UTC time the error was produced, `YYYY-MM-DDTHH:MM:SS.mmmZ`
    pub timestamp: String,
    /// Numeric HTTP status
    pub status: u16,
    /// Short machine-readable error code, e.g. `UNAUTHORIZED`
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Request path, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>, path: Option<String>) -> Self {
        Self::at(Utc::now(), status, message, path)
    }

    pub fn at(
        now: DateTime<Utc>,
        status: StatusCode,
        message: impl Into<String>,
        path: Option<String>,
    ) -> Self {
        Self {
            timestamp: format_timestamp(now),
            status: status.as_u16(),
            error: error_code(status).to_string(),
            message: message.into(),
            path,
        }
    }
}

/// Formats an instant as ISO-8601 with millisecond precision in UTC.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Short error code for a status.
pub fn error_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
        StatusCode::FORBIDDEN => "FORBIDDEN",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_ENTITY",
        StatusCode::TOO_MANY_REQUESTS => "TOO_MANY_REQUESTS",
        StatusCode::SERVICE_UNAVAILABLE => "SERVICE_UNAVAILABLE",
        s if s.is_server_error() => "INTERNAL_SERVER_ERROR",
        _ => "ERROR",
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, Error::msg(message.into()))
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::message(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::message(StatusCode::FORBIDDEN, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::message(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::message(StatusCode::NOT_FOUND, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::message(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::message(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> String {
        if self.status.is_server_error() && self.status != StatusCode::SERVICE_UNAVAILABLE {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.error.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
        }

        let body = ErrorResponse::new(self.status, self.public_message(), None);
        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_has_millisecond_precision() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(format_timestamp(instant), "2025-03-04T05:06:07.000Z");
    }

    #[test]
    fn test_error_response_fields() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let body = ErrorResponse::at(
            instant,
            StatusCode::UNAUTHORIZED,
            "Authentication required",
            Some("/api/v1/users/me".to_string()),
        );

        assert_eq!(body.status, 401);
        assert_eq!(body.error, "UNAUTHORIZED");
        assert_eq!(body.path.as_deref(), Some("/api/v1/users/me"));
    }

    #[test]
    fn test_error_response_omits_missing_path() {
        let body = ErrorResponse::new(StatusCode::BAD_REQUEST, "bad", None);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("path").is_none());
        assert_eq!(json["error"], "BAD_REQUEST");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(error_code(StatusCode::FORBIDDEN), "FORBIDDEN");
        assert_eq!(error_code(StatusCode::BAD_GATEWAY), "INTERNAL_SERVER_ERROR");
        assert_eq!(error_code(StatusCode::IM_A_TEAPOT), "ERROR");
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let err = AppError::internal(anyhow::anyhow!("connection refused to 10.0.0.3"));
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_client_error_keeps_message() {
        let err = AppError::unauthorized("Invalid email or password");
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.public_message(), "Invalid email or password");
    }

    #[test]
    fn test_from_std_error_is_internal() {
        let io = std::io::Error::other("disk");
        let err: AppError = io.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
