//! Persistence port for the poster.
//!
//! The poster only needs four operations; keeping them behind a trait lets
//! the state machine be exercised without a database.

use async_trait::async_trait;
use fantrax_core::types::{DbId, PostNumber, Timestamp};
use fantrax_db::models::recommendation::Recommendation;
use fantrax_db::repositories::{BotSettingsRepo, RecommendationRepo};
use fantrax_db::DbPool;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The conditional update found the row already posted (or gone).
    #[error("recommendation {0} is no longer unposted")]
    AlreadyPosted(DbId),
}

#[async_trait]
pub trait PostingStore: Send + Sync {
    async fn is_paused(&self) -> Result<bool, StoreError>;

    async fn pick_random_unposted(&self) -> Result<Option<Recommendation>, StoreError>;

    /// Highest committed post number, `0` before the first post.
    async fn max_post_number(&self) -> Result<PostNumber, StoreError>;

    /// Atomically move `id` from unposted to posted.
    async fn mark_posted(
        &self,
        id: DbId,
        post_number: PostNumber,
        posted_at: Timestamp,
    ) -> Result<(), StoreError>;
}

/// [`PostingStore`] over the Postgres repositories.
#[derive(Debug, Clone)]
pub struct PgPostingStore {
    pool: DbPool,
}

impl PgPostingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostingStore for PgPostingStore {
    async fn is_paused(&self) -> Result<bool, StoreError> {
        Ok(BotSettingsRepo::is_paused(&self.pool).await?)
    }

    async fn pick_random_unposted(&self) -> Result<Option<Recommendation>, StoreError> {
        Ok(RecommendationRepo::pick_random_unposted(&self.pool).await?)
    }

    async fn max_post_number(&self) -> Result<PostNumber, StoreError> {
        Ok(RecommendationRepo::max_post_number(&self.pool).await?)
    }

    async fn mark_posted(
        &self,
        id: DbId,
        post_number: PostNumber,
        posted_at: Timestamp,
    ) -> Result<(), StoreError> {
        if RecommendationRepo::mark_posted(&self.pool, id, post_number, posted_at).await? {
            Ok(())
        } else {
            Err(StoreError::AlreadyPosted(id))
        }
    }
}
