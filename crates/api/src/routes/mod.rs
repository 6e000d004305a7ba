pub mod admin;
pub mod health;
pub mod submissions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /submissions                  submit a recommendation (POST)
/// /queue                        unposted recommendations, oldest first
///
/// /admin/login                  check the admin password (POST)
/// /admin/status                 pause flag, queue size, schedule
/// /admin/pause                  pause posting (POST)
/// /admin/resume                 resume posting (POST)
/// /admin/posted                 posting history
/// /admin/trigger-post           post one recommendation now (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(submissions::router())
        .nest("/admin", admin::router())
}
