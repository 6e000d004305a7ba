//! The singleton pause-flag row.

use fantrax_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// The `bot_settings` row, or its default when the row does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct BotSettings {
    pub is_paused: bool,
    pub paused_at: Option<Timestamp>,
}
