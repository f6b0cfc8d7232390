//! Boolean and false-safe views over the codec.
//!
//! Nothing here returns an error: every decode failure is logged with its
//! reason and collapsed to `false`, `TokenKind::Unknown`, `0` or `None`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::claims::{Claims, TokenKind};
use crate::codec::{DecodeError, TokenCodec};

#[derive(Debug, Clone)]
pub struct TokenValidator {
    codec: Arc<TokenCodec>,
}

impl TokenValidator {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Decodes `token` as of `now`, logging the rejection reason on failure.
    ///
    /// This is the only method that exposes the tagged reason; it is meant
    /// for diagnostics and for callers that need the claims themselves.
    pub fn check_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, DecodeError> {
        self.codec.decode_at(token, now).inspect_err(|err| match err {
            DecodeError::BadSignature => {
                warn!(reason = err.reason(), "Rejected token with invalid signature")
            }
            _ => debug!(reason = err.reason(), error = %err, "Rejected token"),
        })
    }

    pub fn check(&self, token: &str) -> Result<Claims, DecodeError> {
        self.check_at(token, Utc::now())
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.is_valid_at(token, Utc::now())
    }

    pub fn is_valid_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.check_at(token, now).is_ok()
    }

    pub fn token_kind(&self, token: &str) -> TokenKind {
        self.token_kind_at(token, Utc::now())
    }

    pub fn token_kind_at(&self, token: &str, now: DateTime<Utc>) -> TokenKind {
        self.check_at(token, now)
            .map(|claims| claims.kind)
            .unwrap_or(TokenKind::Unknown)
    }

    pub fn is_access_token(&self, token: &str) -> bool {
        self.token_kind(token) == TokenKind::Access
    }

    pub fn is_access_token_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.token_kind_at(token, now) == TokenKind::Access
    }

    pub fn is_refresh_token(&self, token: &str) -> bool {
        self.token_kind(token) == TokenKind::Refresh
    }

    pub fn is_refresh_token_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.token_kind_at(token, now) == TokenKind::Refresh
    }

    /// True when the token cannot be decoded or is past its expiry.
    pub fn is_expired(&self, token: &str) -> bool {
        !self.is_valid(token)
    }

    /// Seconds until expiry; `0` once expired or when the token is invalid.
    pub fn remaining_lifetime(&self, token: &str) -> i64 {
        self.remaining_lifetime_at(token, Utc::now())
    }

    pub fn remaining_lifetime_at(&self, token: &str, now: DateTime<Utc>) -> i64 {
        self.check_at(token, now)
            .map(|claims| claims.remaining_at(now))
            .unwrap_or(0)
    }

    pub fn subject(&self, token: &str) -> Option<String> {
        self.check(token).ok().map(|claims| claims.sub)
    }
}
