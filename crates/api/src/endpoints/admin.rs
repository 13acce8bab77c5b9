//! Admin moderation endpoints.
//!
//! Role checks live in the services, not here; these handlers only pass
//! the caller through.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use vitrine_common::AppResult;
use vitrine_db::entities::category_suggestion::{self, SuggestionStatus};
use serde::{Deserialize, Serialize};

use crate::endpoints::listings::ListingResponse;
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

const fn default_limit() -> u64 {
    50
}

/// Pagination query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Get listings awaiting review.
async fn pending_listings(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<ListingResponse>>> {
    let listings = state
        .moderation_service
        .get_pending_listings(&user.id, page.limit.min(100), page.offset)
        .await?;
    Ok(ApiResponse::ok(listings.into_iter().map(Into::into).collect()))
}

/// Approve request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub listing_id: String,
}

/// Approve a listing.
async fn approve(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ApproveRequest>,
) -> AppResult<ApiResponse<ListingResponse>> {
    let listing = state
        .moderation_service
        .approve(&user.id, &req.listing_id)
        .await?;
    Ok(ApiResponse::ok(listing.into()))
}

/// Reject request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub listing_id: String,
    /// Feedback shown to the owner; must be non-empty.
    pub message: String,
}

/// Reject a listing with feedback.
async fn reject(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RejectRequest>,
) -> AppResult<ApiResponse<ListingResponse>> {
    let listing = state
        .moderation_service
        .reject_with_feedback(&user.id, &req.listing_id, &req.message)
        .await?;
    Ok(ApiResponse::ok(listing.into()))
}

/// Category suggestion response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub id: String,
    pub category_name: String,
    pub description: Option<String>,
    pub user_id: String,
    pub user_name: String,
    pub status: SuggestionStatus,
    pub created_at: String,
}

impl From<category_suggestion::Model> for SuggestionResponse {
    fn from(s: category_suggestion::Model) -> Self {
        Self {
            id: s.id,
            category_name: s.category_name,
            description: s.description,
            user_id: s.user_id,
            user_name: s.user_name,
            status: s.status,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

/// Get category suggestions awaiting review.
async fn pending_suggestions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<SuggestionResponse>>> {
    let suggestions = state
        .category_suggestion_service
        .get_pending(&user.id, page.limit.min(100), page.offset)
        .await?;
    Ok(ApiResponse::ok(
        suggestions.into_iter().map(Into::into).collect(),
    ))
}

/// Suggestion status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSuggestionStatusRequest {
    pub suggestion_id: String,
    pub status: SuggestionStatus,
}

/// Approve or reject a category suggestion.
async fn set_suggestion_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SetSuggestionStatusRequest>,
) -> AppResult<ApiResponse<SuggestionResponse>> {
    let suggestion = state
        .category_suggestion_service
        .set_status(&user.id, &req.suggestion_id, req.status)
        .await?;
    Ok(ApiResponse::ok(suggestion.into()))
}

/// Site statistics response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStatsResponse {
    pub user_count: i64,
    pub approved_listing_count: i64,
}

/// Get application-wide counters.
async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SiteStatsResponse>> {
    let (user_count, approved_listing_count) =
        state.moderation_service.get_site_stats(&user.id).await?;
    Ok(ApiResponse::ok(SiteStatsResponse {
        user_count,
        approved_listing_count,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/listings/pending", get(pending_listings))
        .route("/listings/approve", post(approve))
        .route("/listings/reject", post(reject))
        .route("/suggestions/pending", get(pending_suggestions))
        .route("/suggestions/set-status", post(set_suggestion_status))
        .route("/stats", get(stats))
}
