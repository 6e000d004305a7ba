use std::net::SocketAddr;
use std::sync::Arc;

use fantrax_poster::{PgPostingStore, Poster, PostingScheduler};
use fantrax_songlink::{LinkResolver, SonglinkClient};
use fantrax_telegram::{DeliveryChannel, TelegramBot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fantrax_api::config::{LogFormat, ServerConfig};
use fantrax_api::router::build_app_router;
use fantrax_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    let json_logs = config.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "fantrax_api=debug,fantrax_poster=debug,tower_http=debug".into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");
    if config.uses_default_admin_password() {
        tracing::warn!("ADMIN_PASSWORD is not set, using the default password");
    }

    // --- Database ---
    let pool = fantrax_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    fantrax_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    fantrax_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- External services ---
    let resolver: Arc<dyn LinkResolver> =
        Arc::new(SonglinkClient::new().expect("Failed to build link resolver client"));

    let channel: Option<Arc<dyn DeliveryChannel>> = config.telegram.as_ref().map(|t| {
        let bot = TelegramBot::new(&t.bot_token, &t.chat_id)
            .expect("Failed to build Telegram client");
        Arc::new(bot) as Arc<dyn DeliveryChannel>
    });

    // --- Poster + scheduler ---
    let store = Arc::new(PgPostingStore::new(pool.clone()));
    let poster = Arc::new(Poster::new(store, channel));

    let scheduler = if poster.is_configured() {
        Some(PostingScheduler::new(Arc::clone(&poster), config.schedule.clone()).start())
    } else {
        tracing::warn!("Telegram credentials not configured, scheduler not started");
        None
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        resolver,
        poster,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if let Some(handle) = scheduler {
        handle.stop().await;
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
