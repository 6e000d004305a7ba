//! In-memory fakes for the poster's ports.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use fantrax_core::types::{DbId, PostNumber, Timestamp};
use fantrax_db::models::recommendation::Recommendation;
use fantrax_poster::{PostingStore, StoreError};
use fantrax_telegram::{DeliveryChannel, MessageId, TelegramError};

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Vec-backed store with the same conditional-update semantics as Postgres.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Recommendation>>,
    paused: AtomicBool,
    fail_commit: AtomicBool,
    /// Artificial latency on every read, to widen race windows.
    read_delay: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<Recommendation>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            ..Default::default()
        })
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    pub fn fail_commits(&self) {
        self.fail_commit.store(true, Ordering::SeqCst);
    }

    pub fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock().unwrap() = Some(delay);
    }

    pub fn snapshot(&self) -> Vec<Recommendation> {
        self.rows.lock().unwrap().clone()
    }

    pub fn get(&self, id: DbId) -> Recommendation {
        self.snapshot()
            .into_iter()
            .find(|r| r.id == id)
            .expect("row exists")
    }

    async fn maybe_delay(&self) {
        let delay = *self.read_delay.lock().unwrap();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
    }
}

#[async_trait]
impl PostingStore for MemoryStore {
    async fn is_paused(&self) -> Result<bool, StoreError> {
        Ok(self.paused.load(Ordering::SeqCst))
    }

    async fn pick_random_unposted(&self) -> Result<Option<Recommendation>, StoreError> {
        self.maybe_delay().await;
        // Deterministic "random": the first unposted row.
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| !r.is_posted)
            .cloned())
    }

    async fn max_post_number(&self) -> Result<PostNumber, StoreError> {
        self.maybe_delay().await;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| r.post_number)
            .max()
            .unwrap_or(0))
    }

    async fn mark_posted(
        &self,
        id: DbId,
        post_number: PostNumber,
        posted_at: Timestamp,
    ) -> Result<(), StoreError> {
        if self.fail_commit.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.post_number == Some(post_number)) {
            return Err(StoreError::Database(sqlx::Error::Protocol(
                "duplicate post_number".into(),
            )));
        }
        match rows.iter_mut().find(|r| r.id == id && !r.is_posted) {
            Some(row) => {
                row.is_posted = true;
                row.post_number = Some(post_number);
                row.posted_at = Some(posted_at);
                Ok(())
            }
            None => Err(StoreError::AlreadyPosted(id)),
        }
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(String),
    Image { url: String, caption: String },
}

/// Records every send and pin.
#[derive(Default)]
pub struct RecordingChannel {
    pub sent: Mutex<Vec<Sent>>,
    pub pinned: Mutex<Vec<MessageId>>,
    next_id: AtomicUsize,
    fail_send: AtomicBool,
    fail_pin: AtomicBool,
    send_delay: Mutex<Option<Duration>>,
}

impl RecordingChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_sends(&self) {
        self.fail_send.store(true, Ordering::SeqCst);
    }

    pub fn fail_pins(&self) {
        self.fail_pin.store(true, Ordering::SeqCst);
    }

    pub fn set_send_delay(&self, delay: Duration) {
        *self.send_delay.lock().unwrap() = Some(delay);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    async fn record(&self, sent: Sent) -> Result<MessageId, TelegramError> {
        let delay = *self.send_delay.lock().unwrap();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(TelegramError::Api {
                status: 400,
                description: "Bad Request: chat not found".into(),
            });
        }
        self.sent.lock().unwrap().push(sent);
        Ok(100 + self.next_id.fetch_add(1, Ordering::SeqCst) as MessageId)
    }
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    async fn send_text(&self, html: &str) -> Result<MessageId, TelegramError> {
        self.record(Sent::Text(html.to_string())).await
    }

    async fn send_image(
        &self,
        image_url: &str,
        caption_html: &str,
    ) -> Result<MessageId, TelegramError> {
        self.record(Sent::Image {
            url: image_url.to_string(),
            caption: caption_html.to_string(),
        })
        .await
    }

    async fn pin(&self, message_id: MessageId) -> Result<(), TelegramError> {
        if self.fail_pin.load(Ordering::SeqCst) {
            return Err(TelegramError::Api {
                status: 400,
                description: "Bad Request: not enough rights to pin".into(),
            });
        }
        self.pinned.lock().unwrap().push(message_id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

pub fn submitted_at() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap()
}

pub fn unposted(id: DbId, album: &str) -> Recommendation {
    Recommendation {
        id,
        submitter_name: format!("Member {id}"),
        album_title: Some(album.to_string()),
        artist_name: Some("Some Artist".to_string()),
        context: "Give it a spin".to_string(),
        spotify_url: Some(format!("https://open.spotify.com/album/{id}")),
        apple_music_url: None,
        songlink_url: Some(format!("https://album.link/s/{id}")),
        album_art_url: None,
        submitted_at: submitted_at(),
        is_posted: false,
        posted_at: None,
        post_number: None,
    }
}
