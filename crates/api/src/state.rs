use std::sync::Arc;

use fantrax_poster::Poster;
use fantrax_songlink::LinkResolver;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fantrax_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Resolves submitted album URLs into cross-platform links.
    pub resolver: Arc<dyn LinkResolver>,
    /// Shared with the scheduler so manual and scheduled posts serialize.
    pub poster: Arc<Poster>,
}
