//! User profile and bookmark endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use vitrine_common::AppResult;
use vitrine_core::{SaveProfileInput, UserProfileView};
use vitrine_db::entities::saved_listing;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Get a user's public profile with reputation aggregates.
async fn profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<UserProfileView>> {
    let profile = state.reputation_service.get_user_profile(&user_id).await?;
    Ok(ApiResponse::ok(profile))
}

/// Save the caller's profile fields.
async fn save_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SaveProfileInput>,
) -> AppResult<ApiResponse<UserProfileView>> {
    let updated = state.account_service.save_profile(&user.id, req).await?;
    Ok(ApiResponse::ok(updated.into()))
}

/// Saved listing response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedListingResponse {
    pub listing_id: String,
    pub title: String,
    pub saved_at: String,
}

impl From<saved_listing::Model> for SavedListingResponse {
    fn from(s: saved_listing::Model) -> Self {
        Self {
            listing_id: s.listing_id,
            title: s.title,
            saved_at: s.saved_at.to_rfc3339(),
        }
    }
}

/// Bookmark request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedListingRequest {
    pub listing_id: String,
}

/// Bookmark a listing.
async fn save_listing(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SavedListingRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .account_service
        .save_listing(&user.id, &req.listing_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Remove a bookmark.
async fn remove_saved_listing(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SavedListingRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .account_service
        .remove_saved_listing(&user.id, &req.listing_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Saved-state response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedStateResponse {
    pub saved: bool,
}

/// Whether the caller bookmarked a listing.
async fn is_saved(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
) -> AppResult<ApiResponse<SavedStateResponse>> {
    let saved = state
        .account_service
        .is_listing_saved(&user.id, &listing_id)
        .await?;
    Ok(ApiResponse::ok(SavedStateResponse { saved }))
}

/// Get the caller's bookmarks.
async fn saved_listings(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<SavedListingResponse>>> {
    let saved = state.account_service.get_saved_listings(&user.id).await?;
    Ok(ApiResponse::ok(saved.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", post(save_profile))
        .route("/saved", get(saved_listings))
        .route("/saved/save", post(save_listing))
        .route("/saved/remove", post(remove_saved_listing))
        .route("/saved/{listing_id}", get(is_saved))
        .route("/{user_id}/profile", get(profile))
}
