//! Handlers for recommendation submission and the public queue.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fantrax_core::submission::validate_submission;
use fantrax_core::types::DbId;
use fantrax_db::models::recommendation::{CreateRecommendation, QueuedRecommendation};
use fantrax_db::repositories::RecommendationRepo;
use serde::{Deserialize, Serialize};

use crate::auth::require_access_code;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /submissions`.
#[derive(Debug, Deserialize)]
pub struct SubmissionRequest {
    pub name: String,
    pub album_url: String,
    pub context: String,
    pub access_code: String,
}

#[derive(Debug, Serialize)]
pub struct SubmissionCreated {
    pub id: DbId,
    pub album_title: Option<String>,
    pub artist_name: Option<String>,
}

/// POST /api/v1/submissions
///
/// Checks the access code, validates the form, resolves the album links and
/// stores the recommendation unposted. Nothing is stored if resolution fails.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmissionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmissionCreated>>)> {
    require_access_code(&state.config, &input.access_code)?;

    let submission = validate_submission(&input.name, &input.album_url, &input.context)?;

    let links = state
        .resolver
        .resolve(&submission.album_url)
        .await
        .inspect_err(|e| {
            tracing::warn!(album_url = %submission.album_url, error = %e, "Link resolution failed");
        })?;

    let create = CreateRecommendation {
        submitter_name: submission.name,
        album_title: links.album_title,
        artist_name: links.artist_name,
        context: submission.context,
        spotify_url: links.spotify_url,
        apple_music_url: links.apple_music_url,
        songlink_url: links.aggregator_url,
        album_art_url: links.album_art_url,
    };
    let rec = RecommendationRepo::create(&state.pool, &create).await?;

    tracing::info!(
        recommendation_id = rec.id,
        submitter = %rec.submitter_name,
        album_title = rec.album_title.as_deref().unwrap_or(""),
        "Recommendation submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmissionCreated {
                id: rec.id,
                album_title: rec.album_title,
                artist_name: rec.artist_name,
            },
        }),
    ))
}

/// GET /api/v1/queue
pub async fn list_queue(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<QueuedRecommendation>>>> {
    let queue = RecommendationRepo::list_unposted(&state.pool).await?;
    Ok(Json(DataResponse { data: queue }))
}
