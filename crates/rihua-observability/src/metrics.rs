use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Installs the global Prometheus recorder and spawns its upkeep task.
///
/// Must be called from inside a Tokio runtime, at most once per process.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(UPKEEP_INTERVAL).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(handle)
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    // Unmatched paths share one label so arbitrary URLs cannot blow up cardinality.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(start.elapsed().as_secs_f64());

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// `kind` is `access` or `refresh`.
pub fn track_token_issued(kind: &'static str) {
    counter!("auth_tokens_issued_total", "kind" => kind).increment(1);
}

pub fn track_login_success(role: &str) {
    counter!("auth_logins_total", "status" => "success", "role" => role.to_string()).increment(1);
}

pub fn track_login_failure(reason: &'static str) {
    counter!("auth_logins_total", "status" => "failure", "reason" => reason).increment(1);
}

/// Outcome of resolving a request's identity: `identified`, `anonymous`,
/// `invalid`, `refresh_rejected`, or `internal_error` when resolution panicked.
pub fn track_identity_resolution(outcome: &'static str) {
    counter!("auth_resolution_total", "outcome" => outcome).increment(1);
}
