//! Token codec: the trust boundary between anonymous input and the rest of
//! the system.
//!
//! Tokens are compact JWS strings signed with HMAC-SHA512. [`TokenCodec::decode`]
//! never returns [`Claims`] for a token whose signature does not verify
//! against the configured key.
//!
//! Expiry is checked here rather than by `jsonwebtoken`, against an explicit
//! instant and with zero leeway, so that callers (and tests) can decide what
//! "now" is. A token is expired once `now >= exp`.

use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use rihua_config::JwtConfig;

use crate::claims::Claims;

/// Minimum signing key length in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Signature algorithm for every token this service issues.
pub const ALGORITHM: Algorithm = Algorithm::HS512;

/// Configuration-time and signing failures. These are fatal, not per-request.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JWT secret must be at least {MIN_SECRET_LENGTH} bytes long, got {length}")]
    WeakKey { length: usize },
    #[error("{kind} token lifetime must be positive, got {seconds}s")]
    InvalidTtl { kind: &'static str, seconds: i64 },
    #[error("token expiry is out of range")]
    ExpiryOutOfRange,
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Why a token was rejected. Kept distinct for diagnostics only; request
/// handling collapses all of these to "anonymous".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token has expired")]
    Expired,
}

impl DecodeError {
    /// Stable short label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            DecodeError::Malformed(_) => "malformed",
            DecodeError::BadSignature => "bad_signature",
            DecodeError::Expired => "expired",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => DecodeError::BadSignature,
            ErrorKind::ExpiredSignature => DecodeError::Expired,
            _ => DecodeError::Malformed(err.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Builds a codec, rejecting keys shorter than [`MIN_SECRET_LENGTH`].
    pub fn new(secret: &[u8]) -> Result<Self, CodecError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(CodecError::WeakKey {
                length: secret.len(),
            });
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self, CodecError> {
        Self::new(config.secret.as_bytes())
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, CodecError> {
        Ok(encode(&Header::new(ALGORITHM), claims, &self.encoding_key)?)
    }

    /// Verifies and decodes `token` against the wall clock.
    pub fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        self.decode_at(token, Utc::now())
    }

    /// Verifies and decodes `token` as of `now`.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, DecodeError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if claims.iat >= claims.exp {
            return Err(DecodeError::Malformed(
                "issued-at must precede expiry".to_string(),
            ));
        }

        if claims.is_expired_at(now) {
            return Err(DecodeError::Expired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &ALGORITHM)
            .finish_non_exhaustive()
    }
}
