use axum::{Router, routing::get};

use super::controller::get_me;
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}
