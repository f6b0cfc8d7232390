use chrono::Utc;
use rihua_auth::TokenPair;
use rihua_core::{AppError, verify_dummy_password, verify_password};
use rihua_observability::{track_login_failure, track_login_success, track_token_issued};
use tracing::{info, warn};

use super::model::{LoginRequest, LoginResponse, RefreshRequest, UserSummary};
use crate::modules::users::model::UserCredentials;
use crate::state::AppState;

/// Single message for every credential failure, so responses never reveal
/// whether an account exists.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const INVALID_REFRESH_TOKEN: &str = "Invalid or expired refresh token";

pub struct AuthService;

impl AuthService {
    pub async fn login(state: &AppState, dto: LoginRequest) -> Result<LoginResponse, AppError> {
        let Some(user) = state.credentials.find_by_email(&dto.email).await? else {
            verify_dummy_password(&dto.password);
            track_login_failure("unknown_user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &user.password_hash)? {
            track_login_failure("bad_password");
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        if !user.enabled {
            track_login_failure("disabled");
            return Err(AppError::unauthorized("Account is disabled"));
        }
        if user.locked {
            track_login_failure("locked");
            return Err(AppError::unauthorized("Account is locked"));
        }

        let tokens = Self::issue_tokens(state, &user)?;

        let role = user
            .roles
            .iter()
            .max()
            .map(|role| role.as_str())
            .unwrap_or("none");
        track_login_success(role);
        info!(user_id = %user.id, "User logged in");

        let summary = UserSummary::from_credentials(&user, &state.server_config.default_language);
        Ok(LoginResponse::new(tokens, summary))
    }

    /// Exchanges a refresh token for a new pair.
    ///
    /// The user is reloaded so role changes and account locks take effect at
    /// refresh time. The presented refresh token stays valid until it expires.
    pub async fn refresh(state: &AppState, dto: RefreshRequest) -> Result<TokenPair, AppError> {
        let claims = state
            .validator
            .check(&dto.refresh_token)
            .map_err(|_| AppError::unauthorized(INVALID_REFRESH_TOKEN))?;

        if !claims.is_refresh() {
            warn!(kind = claims.kind.as_str(), "Non-refresh token presented for refresh");
            return Err(AppError::unauthorized(INVALID_REFRESH_TOKEN));
        }

        let user = state
            .credentials
            .find_by_id(&claims.sub)
            .await?
            .filter(UserCredentials::can_sign_in)
            .ok_or_else(|| AppError::unauthorized(INVALID_REFRESH_TOKEN))?;

        let tokens = Self::issue_tokens(state, &user)?;
        info!(user_id = %user.id, "Token pair refreshed");
        Ok(tokens)
    }

    fn issue_tokens(state: &AppState, user: &UserCredentials) -> Result<TokenPair, AppError> {
        let tokens = state.issuer.issue_pair(
            &user.id,
            &user.email,
            &user.roles,
            user.preferred_language.as_deref(),
            Utc::now(),
        )?;
        track_token_issued("access");
        track_token_issued("refresh");
        Ok(tokens)
    }
}
