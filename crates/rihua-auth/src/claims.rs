//! Claim set carried by every token.
//!
//! Access and refresh tokens share one claim structure; the `type` claim
//! distinguishes them. Refresh tokens carry neither roles, email nor language.
//!
//! Wire names:
//!
//! | Field       | Claim   | Access | Refresh |
//! |-------------|---------|--------|---------|
//! | `sub`       | `sub`   | yes    | yes     |
//! | `kind`      | `type`  | yes    | yes     |
//! | `roles`     | `roles` | yes    | no      |
//! | `email`     | `email` | yes    | no      |
//! | `language`  | `lang`  | yes    | no      |
//! | `iat`/`exp` | same    | yes    | yes     |
//! | `jti`       | `jti`   | yes    | yes     |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Intended use of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Authorizes API requests
    Access,
    /// Only exchangeable for a new token pair
    Refresh,
    /// Signed by us but with a `type` this version does not know
    #[serde(other)]
    Unknown,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "lang", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
    /// Unique token id
    #[serde(default)]
    pub jti: String,
}

impl Claims {
    pub fn is_access(&self) -> bool {
        self.kind == TokenKind::Access
    }

    pub fn is_refresh(&self) -> bool {
        self.kind == TokenKind::Refresh
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whole seconds left before expiry at `now`, never negative.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> i64 {
        (self.exp - now.timestamp()).max(0)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
