//! Rihua Observability
//!
//! - Tracing subscriber setup: console, error file and JSON file layers
//! - Request logging middleware
//! - Prometheus metrics: HTTP request counters and auth event counters
//!
//! ```no_run
//! use rihua_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing("storage/logs")?;
//!     let handle = init_metrics()?;
//!     // ... application code ...
//!     println!("{}", handle.render());
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod metrics;

pub use metrics_exporter_prometheus::PrometheusHandle;

pub use logging::{init_basic_console_logging, init_tracing, logging_middleware};
pub use metrics::{
    init_metrics, metrics_middleware, track_identity_resolution, track_login_failure,
    track_login_success, track_token_issued,
};
