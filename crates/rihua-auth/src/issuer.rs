//! Token issuance for login and refresh flows.
//!
//! Access tokens are short-lived and carry the subject's roles, email and
//! preferred language. Refresh tokens are long-lived and carry only the
//! subject. Issuance is stateless; every token gets a fresh `jti`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use rihua_config::JwtConfig;
use rihua_config::server::DEFAULT_LANGUAGE;

use crate::claims::{Claims, TokenKind};
use crate::codec::{CodecError, TokenCodec};
use crate::roles::Role;

/// Access/refresh token pair returned by the login and refresh endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    default_language: String,
}

impl TokenIssuer {
    /// Fails when either lifetime is not positive.
    pub fn new(codec: Arc<TokenCodec>, config: &JwtConfig) -> Result<Self, CodecError> {
        Ok(Self {
            codec,
            access_ttl: positive_ttl("access", config.access_token_expiry)?,
            refresh_ttl: positive_ttl("refresh", config.refresh_token_expiry)?,
            default_language: DEFAULT_LANGUAGE.to_string(),
        })
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Issues an access token. `roles` are copied verbatim, in order.
    pub fn issue_access_token(
        &self,
        subject: &str,
        email: &str,
        roles: &[Role],
        language: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<String, CodecError> {
        let language = language
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .unwrap_or(self.default_language.as_str());

        let claims = Claims {
            sub: subject.to_string(),
            kind: TokenKind::Access,
            roles: roles.to_vec(),
            email: Some(email.to_string()),
            language: Some(language.to_string()),
            iat: now.timestamp(),
            exp: expiry(now, self.access_ttl)?,
            jti: Uuid::new_v4().to_string(),
        };

        self.codec.encode(&claims)
    }

    pub fn issue_refresh_token(
        &self,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<String, CodecError> {
        let claims = Claims {
            sub: subject.to_string(),
            kind: TokenKind::Refresh,
            roles: Vec::new(),
            email: None,
            language: None,
            iat: now.timestamp(),
            exp: expiry(now, self.refresh_ttl)?,
            jti: Uuid::new_v4().to_string(),
        };

        self.codec.encode(&claims)
    }

    pub fn issue_pair(
        &self,
        subject: &str,
        email: &str,
        roles: &[Role],
        language: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, CodecError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(subject, email, roles, language, now)?,
            refresh_token: self.issue_refresh_token(subject, now)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl.num_seconds(),
        })
    }
}

/// Lifetimes must be positive and must leave room for an expiry instant
/// that `chrono` can represent.
fn positive_ttl(kind: &'static str, seconds: i64) -> Result<Duration, CodecError> {
    if seconds <= 0 {
        return Err(CodecError::InvalidTtl { kind, seconds });
    }
    Duration::try_seconds(seconds)
        .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or(CodecError::InvalidTtl { kind, seconds })
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> Result<i64, CodecError> {
    now.checked_add_signed(ttl)
        .map(|exp| exp.timestamp())
        .ok_or(CodecError::ExpiryOutOfRange)
}
