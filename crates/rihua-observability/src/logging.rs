use std::fs;
use std::path::Path;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Header echoed back on every response so clients can quote it in bug reports.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %matched_path,
        "Incoming request"
    );

    let mut response = next.run(req).await;
    let latency = start.elapsed();
    let status = response.status().as_u16();

    match status {
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms = %latency.as_millis(),
            "Client error"
        ),
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms = %latency.as_millis(),
            "Server error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms = %latency.as_millis(),
            "Request completed"
        ),
    }

    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rihua=info,rihua_auth=info,tower_http=warn,hyper=info"))
}

/// Installs the global subscriber used by the server.
///
/// Three layers:
///
/// - compact console output filtered by `RUST_LOG`
/// - `rihua.log`, errors only, rotated daily
/// - `rihua.json`, structured info-level events, rotated daily
pub fn init_tracing(log_dir: impl AsRef<Path>) -> anyhow::Result<()> {
    let log_dir = log_dir.as_ref();
    fs::create_dir_all(log_dir)?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(default_filter());

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "rihua.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    let json_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "rihua.json");
    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .try_init()?;

    info!(log_dir = %log_dir.display(), "Tracing initialized");
    Ok(())
}

/// Console-only logging for the CLI.
///
/// Level comes from `LOG_LEVEL` (default `warn`) unless `RUST_LOG` is set.
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rihua={log_level},rihua_auth={log_level}")));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
