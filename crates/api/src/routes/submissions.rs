//! Public submission routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// ```text
/// POST /submissions -> submit
/// GET  /queue       -> list_queue
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submissions", post(submissions::submit))
        .route("/queue", get(submissions::list_queue))
}
