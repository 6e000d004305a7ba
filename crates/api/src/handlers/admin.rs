//! Handlers for the `/admin` resource.
//!
//! Mutating actions require the shared admin password in the request body.
//! Status and history are read-only and public.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fantrax_core::types::{DbId, PostNumber, Timestamp};
use fantrax_db::models::bot_settings::BotSettings;
use fantrax_db::models::recommendation::PostedRecommendation;
use fantrax_db::repositories::{BotSettingsRepo, RecommendationRepo};
use fantrax_poster::PostOutcome;
use fantrax_telegram::MessageId;
use serde::{Deserialize, Serialize};

use crate::auth::require_admin;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of every password-protected admin action.
#[derive(Debug, Deserialize)]
pub struct AdminPasswordRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub is_paused: bool,
    pub paused_at: Option<Timestamp>,
    pub pending_count: i64,
    /// Human-readable posting calendar, e.g. `Mon/Wed/Fri at 07:00 Europe/London`.
    pub schedule: String,
    /// `false` when no delivery credentials are configured.
    pub posting_enabled: bool,
}

/// Result of a manual trigger.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TriggerResponse {
    Posted {
        recommendation_id: DbId,
        post_number: PostNumber,
        message_id: MessageId,
    },
    Skipped {
        reason: &'static str,
    },
    Failed {
        error: String,
    },
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<AdminPasswordRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    require_admin(&state.config, &input.password)?;
    Ok(Json(DataResponse {
        data: LoginResponse {
            authenticated: true,
        },
    }))
}

/// GET /api/v1/admin/status
pub async fn status(State(state): State<AppState>) -> AppResult<Json<DataResponse<StatusResponse>>> {
    let settings = BotSettingsRepo::get_or_default(&state.pool).await?;
    let pending_count = RecommendationRepo::count_unposted(&state.pool).await?;

    Ok(Json(DataResponse {
        data: StatusResponse {
            is_paused: settings.is_paused,
            paused_at: settings.paused_at,
            pending_count,
            schedule: state.config.schedule.to_string(),
            posting_enabled: state.poster.is_configured(),
        },
    }))
}

/// POST /api/v1/admin/pause
pub async fn pause(
    State(state): State<AppState>,
    Json(input): Json<AdminPasswordRequest>,
) -> AppResult<Json<DataResponse<BotSettings>>> {
    require_admin(&state.config, &input.password)?;

    let settings = BotSettingsRepo::set_paused(&state.pool, true, Some(chrono::Utc::now())).await?;
    tracing::info!("Posting paused by admin");

    Ok(Json(DataResponse { data: settings }))
}

/// POST /api/v1/admin/resume
pub async fn resume(
    State(state): State<AppState>,
    Json(input): Json<AdminPasswordRequest>,
) -> AppResult<Json<DataResponse<BotSettings>>> {
    require_admin(&state.config, &input.password)?;

    let settings = BotSettingsRepo::set_paused(&state.pool, false, None).await?;
    tracing::info!("Posting resumed by admin");

    Ok(Json(DataResponse { data: settings }))
}

/// GET /api/v1/admin/posted
pub async fn list_posted(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PostedRecommendation>>>> {
    let history = RecommendationRepo::list_posted(&state.pool).await?;
    Ok(Json(DataResponse { data: history }))
}

/// POST /api/v1/admin/trigger-post
///
/// Runs one posting cycle immediately. Skips are reported with 200; a
/// failed delivery or commit is reported with 502.
pub async fn trigger_post(
    State(state): State<AppState>,
    Json(input): Json<AdminPasswordRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TriggerResponse>>)> {
    require_admin(&state.config, &input.password)?;

    tracing::info!("Manual post triggered by admin");
    let (status, data) = match state.poster.post_next().await {
        PostOutcome::Posted {
            recommendation_id,
            post_number,
            message_id,
        } => (
            StatusCode::OK,
            TriggerResponse::Posted {
                recommendation_id,
                post_number,
                message_id,
            },
        ),
        PostOutcome::Skipped(reason) => (
            StatusCode::OK,
            TriggerResponse::Skipped {
                reason: reason.as_str(),
            },
        ),
        PostOutcome::Failed(e) => (
            StatusCode::BAD_GATEWAY,
            TriggerResponse::Failed {
                error: e.to_string(),
            },
        ),
    };

    Ok((status, Json(DataResponse { data })))
}
