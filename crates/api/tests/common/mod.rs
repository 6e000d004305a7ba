#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use fantrax_api::config::{LogFormat, ServerConfig};
use fantrax_api::router::build_app_router;
use fantrax_api::state::AppState;
use fantrax_core::schedule::PostingSchedule;
use fantrax_poster::{PgPostingStore, Poster};
use fantrax_songlink::{LinkResolver, ResolveError, ResolvedLinks};
use fantrax_telegram::{DeliveryChannel, MessageId, TelegramError};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const ACCESS_CODE: &str = "let-me-in";
pub const ADMIN_PASSWORD: &str = "correct horse";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8000".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        telegram: None,
        access_code: ACCESS_CODE.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        schedule: PostingSchedule::default(),
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../static"),
        log_format: LogFormat::Text,
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Resolver returning a canned answer and counting calls.
pub struct StubResolver {
    answer: Option<ResolvedLinks>,
    pub calls: AtomicUsize,
}

impl StubResolver {
    pub fn returning(links: ResolvedLinks) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(links),
            calls: AtomicUsize::new(0),
        })
    }

    /// Every call fails as if the service answered 404.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkResolver for StubResolver {
    async fn resolve(&self, _url: &str) -> Result<ResolvedLinks, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .clone()
            .ok_or(ResolveError::HttpStatus { status: 404 })
    }
}

/// Channel recording sent bodies.
#[derive(Default)]
pub struct RecordingChannel {
    pub sent: Mutex<Vec<String>>,
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    async fn send_text(&self, html: &str) -> Result<MessageId, TelegramError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(html.to_string());
        Ok(sent.len() as MessageId)
    }

    async fn send_image(
        &self,
        _image_url: &str,
        caption_html: &str,
    ) -> Result<MessageId, TelegramError> {
        self.send_text(caption_html).await
    }

    async fn pin(&self, _message_id: MessageId) -> Result<(), TelegramError> {
        Ok(())
    }
}

pub fn resolved_xy() -> ResolvedLinks {
    ResolvedLinks {
        spotify_url: Some("s".to_string()),
        apple_music_url: None,
        aggregator_url: Some("a".to_string()),
        album_title: Some("X".to_string()),
        artist_name: Some("Y".to_string()),
        album_art_url: None,
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Full router with the given resolver and delivery channel.
pub fn build_app(
    pool: PgPool,
    resolver: Arc<dyn LinkResolver>,
    channel: Option<Arc<dyn DeliveryChannel>>,
) -> Router {
    let config = test_config();
    let poster = Arc::new(Poster::new(
        Arc::new(PgPostingStore::new(pool.clone())),
        channel,
    ));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        resolver,
        poster,
    };
    build_app_router(state, &config)
}

/// Router with a resolver that answers `X` by `Y` and no delivery channel.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(pool, StubResolver::returning(resolved_xy()), None)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}
