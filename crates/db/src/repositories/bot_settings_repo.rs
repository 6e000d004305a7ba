//! Repository for the singleton `bot_settings` row.

use fantrax_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::bot_settings::BotSettings;

const COLUMNS: &str = "is_paused, paused_at";

/// Reads and writes the posting pause flag.
pub struct BotSettingsRepo;

impl BotSettingsRepo {
    /// Current settings, or the not-paused default if no admin has touched
    /// them yet.
    pub async fn get_or_default(pool: &PgPool) -> Result<BotSettings, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bot_settings WHERE id = 1");
        let row = sqlx::query_as::<_, BotSettings>(&query)
            .fetch_optional(pool)
            .await?;
        Ok(row.unwrap_or_default())
    }

    pub async fn is_paused(pool: &PgPool) -> Result<bool, sqlx::Error> {
        Ok(Self::get_or_default(pool).await?.is_paused)
    }

    /// Set the flag, creating the row on first use.
    ///
    /// `paused_at` is stored as given; callers pass `None` when resuming.
    pub async fn set_paused(
        pool: &PgPool,
        is_paused: bool,
        paused_at: Option<Timestamp>,
    ) -> Result<BotSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO bot_settings (id, is_paused, paused_at, updated_at) \
             VALUES (1, $1, $2, NOW()) \
             ON CONFLICT (id) DO UPDATE SET \
                 is_paused = EXCLUDED.is_paused, \
                 paused_at = EXCLUDED.paused_at, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BotSettings>(&query)
            .bind(is_paused)
            .bind(paused_at)
            .fetch_one(pool)
            .await
    }
}
