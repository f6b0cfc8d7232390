use axum::{Router, routing::get};

use super::controller::{health, info, metrics};
use crate::state::AppState;

pub fn init_health_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/metrics", get(metrics))
}
