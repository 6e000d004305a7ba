//! Repository for the `recommendations` table.

use fantrax_core::types::{DbId, PostNumber, Timestamp};
use sqlx::PgPool;

use crate::models::recommendation::{
    CreateRecommendation, PostedRecommendation, QueuedRecommendation, Recommendation,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const COLUMNS: &str = "\
    id, submitter_name, album_title, artist_name, context, \
    spotify_url, apple_music_url, songlink_url, album_art_url, \
    submitted_at, is_posted, posted_at, post_number";

const QUEUE_COLUMNS: &str = "id, submitter_name, album_title, artist_name, submitted_at";

const POSTED_COLUMNS: &str = "\
    id, post_number, submitter_name, album_title, artist_name, \
    spotify_url, apple_music_url, songlink_url, posted_at";

/// Queries and state transitions for submitted recommendations.
pub struct RecommendationRepo;

impl RecommendationRepo {
    /// Insert a new, unposted recommendation.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRecommendation,
    ) -> Result<Recommendation, sqlx::Error> {
        let query = format!(
            "INSERT INTO recommendations \
                (submitter_name, album_title, artist_name, context, \
                 spotify_url, apple_music_url, songlink_url, album_art_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recommendation>(&query)
            .bind(&input.submitter_name)
            .bind(&input.album_title)
            .bind(&input.artist_name)
            .bind(&input.context)
            .bind(&input.spotify_url)
            .bind(&input.apple_music_url)
            .bind(&input.songlink_url)
            .bind(&input.album_art_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Recommendation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recommendations WHERE id = $1");
        sqlx::query_as::<_, Recommendation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Unposted recommendations, oldest submission first.
    pub async fn list_unposted(pool: &PgPool) -> Result<Vec<QueuedRecommendation>, sqlx::Error> {
        let query = format!(
            "SELECT {QUEUE_COLUMNS} FROM recommendations \
             WHERE NOT is_posted \
             ORDER BY submitted_at ASC, id ASC"
        );
        sqlx::query_as::<_, QueuedRecommendation>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn count_unposted(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recommendations WHERE NOT is_posted")
            .fetch_one(pool)
            .await
    }

    /// One unposted recommendation drawn uniformly at random, or `None` when
    /// the queue is empty.
    pub async fn pick_random_unposted(
        pool: &PgPool,
    ) -> Result<Option<Recommendation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recommendations \
             WHERE NOT is_posted \
             ORDER BY random() \
             LIMIT 1"
        );
        sqlx::query_as::<_, Recommendation>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Highest post number committed so far, `0` when nothing has been posted.
    pub async fn max_post_number(pool: &PgPool) -> Result<PostNumber, sqlx::Error> {
        sqlx::query_scalar::<_, PostNumber>(
            "SELECT COALESCE(MAX(post_number), 0) FROM recommendations",
        )
        .fetch_one(pool)
        .await
    }

    /// Transition one recommendation from unposted to posted.
    ///
    /// Returns `false` if the row does not exist or was already posted. A
    /// post number already taken by another row fails with a unique
    /// violation on `uq_recommendations_post_number`.
    pub async fn mark_posted(
        pool: &PgPool,
        id: DbId,
        post_number: PostNumber,
        posted_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE recommendations \
             SET is_posted = TRUE, post_number = $2, posted_at = $3 \
             WHERE id = $1 AND is_posted = FALSE",
        )
        .bind(id)
        .bind(post_number)
        .bind(posted_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Posting history ordered by post number.
    pub async fn list_posted(pool: &PgPool) -> Result<Vec<PostedRecommendation>, sqlx::Error> {
        let query = format!(
            "SELECT {POSTED_COLUMNS} FROM recommendations \
             WHERE is_posted \
             ORDER BY post_number ASC"
        );
        sqlx::query_as::<_, PostedRecommendation>(&query)
            .fetch_all(pool)
            .await
    }
}
