use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use rihua::modules::users::store::InMemoryCredentialStore;
use rihua::router::init_router;
use rihua::state::AppState;
use rihua_config::{JwtConfig, ServerConfig};
use rihua_observability::{init_metrics, init_tracing};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env();
    init_tracing(&server_config.log_dir).context("failed to initialize tracing")?;

    let jwt_config = JwtConfig::from_env();

    let credentials = match &server_config.seed_users_file {
        Some(path) => InMemoryCredentialStore::from_json_file(path)?,
        None => {
            warn!("SEED_USERS_FILE is not set; no user will be able to log in");
            InMemoryCredentialStore::default()
        }
    };

    let metrics = init_metrics().context("failed to install metrics recorder")?;

    let bind_address = server_config.bind_address();
    let state = AppState::new(&jwt_config, server_config, Arc::new(credentials))
        .context("invalid JWT configuration")?
        .with_metrics(metrics);
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    info!(address = %bind_address, "Server listening");
    info!("Swagger UI available at /swagger-ui, Scalar at /scalar");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
