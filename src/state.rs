use std::fmt;
use std::sync::Arc;

use rihua_auth::{CodecError, TokenCodec, TokenIssuer, TokenValidator};
use rihua_config::{JwtConfig, ServerConfig};
use rihua_observability::PrometheusHandle;

use crate::middleware::policy::RoutePolicyTable;
use crate::modules::users::store::CredentialStore;

/// Shared, read-only application state.
///
/// Everything here is built once at startup and never mutated while serving.
#[derive(Clone)]
pub struct AppState {
    pub issuer: TokenIssuer,
    pub validator: TokenValidator,
    pub policy: Arc<RoutePolicyTable>,
    pub server_config: Arc<ServerConfig>,
    pub credentials: Arc<dyn CredentialStore>,
    /// `None` when no Prometheus recorder is installed (e.g. in tests).
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Fails on a weak signing key or a non-positive token lifetime.
    pub fn new(
        jwt_config: &JwtConfig,
        server_config: ServerConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, CodecError> {
        let codec = Arc::new(TokenCodec::from_config(jwt_config)?);
        let issuer = TokenIssuer::new(codec.clone(), jwt_config)?
            .with_default_language(server_config.default_language.clone());

        Ok(Self {
            issuer,
            validator: TokenValidator::new(codec),
            policy: Arc::new(RoutePolicyTable::rihua_default()),
            server_config: Arc::new(server_config),
            credentials,
            metrics: None,
        })
    }

    pub fn with_policy(mut self, policy: RoutePolicyTable) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("issuer", &self.issuer)
            .field("validator", &self.validator)
            .field("policy_rules", &self.policy.rules().len())
            .field("server_config", &self.server_config)
            .field("credentials", &self.credentials)
            .field("metrics_enabled", &self.metrics.is_some())
            .finish()
    }
}
