//! Review endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use vitrine_common::AppResult;
use vitrine_core::SubmitReviewInput;
use vitrine_db::entities::review;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

const fn default_limit() -> u64 {
    20
}

/// Submit review request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub reviewed_user_id: String,
    #[serde(flatten)]
    pub input: SubmitReviewInput,
}

/// Review response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub reviewed_user_id: String,
    pub rating: i32,
    pub comment: String,
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub listing_id: String,
    pub created_at: String,
}

impl From<review::Model> for ReviewResponse {
    fn from(r: review::Model) -> Self {
        Self {
            id: r.id,
            reviewed_user_id: r.reviewed_user_id,
            rating: r.rating,
            comment: r.comment,
            reviewer_id: r.reviewer_id,
            reviewer_name: r.reviewer_name,
            listing_id: r.listing_id,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Submit a review of another user.
async fn submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitReviewRequest>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state
        .reputation_service
        .submit_review(&user.id, &req.reviewed_user_id, req.input)
        .await?;
    Ok(ApiResponse::ok(review.into()))
}

/// Pagination query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Get the reviews a user has received, newest first.
async fn for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<ReviewResponse>>> {
    let reviews = state
        .reputation_service
        .get_user_reviews(&user_id, page.limit.min(100), page.offset)
        .await?;
    Ok(ApiResponse::ok(reviews.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submit", post(submit))
        .route("/user/{user_id}", get(for_user))
}
