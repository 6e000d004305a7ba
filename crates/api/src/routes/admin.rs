//! Admin routes mounted at `/admin`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// POST /login        -> login
/// GET  /status       -> status
/// POST /pause        -> pause
/// POST /resume       -> resume
/// GET  /posted       -> list_posted
/// POST /trigger-post -> trigger_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/status", get(admin::status))
        .route("/pause", post(admin::pause))
        .route("/resume", post(admin::resume))
        .route("/posted", get(admin::list_posted))
        .route("/trigger-post", post(admin::trigger_post))
}
