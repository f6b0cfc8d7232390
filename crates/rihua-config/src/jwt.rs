use std::env;
use std::fmt;

/// Default access token lifetime: 1 hour.
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 3600;
/// Default refresh token lifetime: 30 days.
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 2_592_000;

/// Token signing configuration.
///
/// | Variable             | Default   | Notes                        |
/// |----------------------|-----------|------------------------------|
/// | `JWT_SECRET`         | *(empty)* | must be at least 32 bytes    |
/// | `JWT_ACCESS_EXPIRY`  | `3600`    | seconds                      |
/// | `JWT_REFRESH_EXPIRY` | `2592000` | seconds                      |
///
/// A missing secret is left empty so that key validation at startup rejects it
/// instead of silently signing with a well-known fallback.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET").unwrap_or_default(),
            access_token_expiry: parse_seconds("JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_TOKEN_EXPIRY),
            refresh_token_expiry: parse_seconds(
                "JWT_REFRESH_EXPIRY",
                DEFAULT_REFRESH_TOKEN_EXPIRY,
            ),
        }
    }
}

fn parse_seconds(var: &str, default: i64) -> i64 {
    match env::var(var) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(
                variable = var,
                value = %raw,
                default,
                "Ignoring unparsable token lifetime"
            );
            default
        }),
        Err(_) => default,
    }
}

// Keeps the secret out of logs and panic messages.
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &format_args!("<{} bytes redacted>", self.secret.len()))
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish()
    }
}
