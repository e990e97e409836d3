//! Species suggestion endpoints
//!
//! HTTP wrappers over the workflow in [`crate::suggestions`]; authorization
//! and state checks live there, not here.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use antguide_common::db::models::SpeciesSuggestion;

use crate::api::ApiError;
use crate::auth::Requester;
use crate::suggestions::{self, Decision, NewSuggestion};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Pre-existing species being amended, if any
    pub species_id: Option<i64>,
    #[serde(flatten)]
    pub proposal: NewSuggestion,
}

/// POST /api/suggestions
pub async fn suggestion_submit(
    State(state): State<AppState>,
    requester: Requester,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SpeciesSuggestion>, ApiError> {
    let suggestion = suggestions::submit(
        &state.db,
        &requester,
        request.species_id,
        request.proposal,
    )
    .await?;
    Ok(Json(suggestion))
}

/// GET /api/suggestions (moderators only)
pub async fn suggestion_list(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<Vec<SpeciesSuggestion>>, ApiError> {
    let list = suggestions::list_pending(&state.db, &requester).await?;
    Ok(Json(list))
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub action: Decision,
}

/// POST /api/suggestions/:id/review (moderators only)
pub async fn suggestion_review(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<i64>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<SpeciesSuggestion>, ApiError> {
    let suggestion = suggestions::review(&state.db, &requester, id, request.action).await?;
    Ok(Json(suggestion))
}
