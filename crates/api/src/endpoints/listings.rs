//! Listing endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::Utc;
use vitrine_common::AppResult;
use vitrine_core::{BrowseFilter, CreateListingInput, UpdateListingInput};
use vitrine_db::entities::listing::{self, ListingCategory, ListingDetails};
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

const fn default_limit() -> u64 {
    20
}

/// Browse query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseQuery {
    pub category: Option<ListingCategory>,
    pub max_price: Option<f64>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Listing response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub details: ListingDetails,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub image_url: Option<String>,
    pub gallery: serde_json::Value,
    pub owner_id: String,
    pub status: String,
    pub is_featured: bool,
    pub featured_until: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<listing::Model> for ListingResponse {
    fn from(l: listing::Model) -> Self {
        // Readers never see an elapsed promotion as featured.
        let is_featured = l.is_currently_featured(Utc::now());
        Self {
            id: l.id,
            title: l.title,
            description: l.description,
            price: l.price,
            category: l.category.to_value(),
            details: l.details,
            postal_code: l.postal_code,
            city: l.city,
            state: l.state,
            image_url: l.image_url,
            gallery: l.gallery,
            owner_id: l.owner_id,
            status: l.status.to_value(),
            is_featured,
            featured_until: l.featured_until.map(|t| t.to_rfc3339()),
            created_at: l.created_at.to_rfc3339(),
            updated_at: l.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Browse approved listings.
async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> AppResult<ApiResponse<Vec<ListingResponse>>> {
    let limit = query.limit.min(100);
    let filter = BrowseFilter {
        category: query.category,
        max_price: query.max_price,
    };

    let listings = state
        .listing_service
        .browse(filter, limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(listings.into_iter().map(Into::into).collect()))
}

/// Get a publicly visible listing.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ListingResponse>> {
    let listing = state.listing_service.get_public(&id).await?;
    Ok(ApiResponse::ok(listing.into()))
}

/// Create a listing (enters moderation as pending).
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateListingInput>,
) -> AppResult<ApiResponse<ListingResponse>> {
    let listing = state.listing_service.create(&user.id, req).await?;
    Ok(ApiResponse::ok(listing.into()))
}

/// Update listing request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    pub listing_id: String,
    #[serde(flatten)]
    pub input: UpdateListingInput,
}

/// Apply an owner content edit.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateListingRequest>,
) -> AppResult<ApiResponse<ListingResponse>> {
    let listing = state
        .listing_service
        .update(&user.id, &req.listing_id, req.input)
        .await?;
    Ok(ApiResponse::ok(listing.into()))
}

/// Delete listing request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteListingRequest {
    pub listing_id: String,
}

/// Delete a listing (owner or admin).
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteListingRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .listing_service
        .delete(&user.id, &req.listing_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Get the caller's own listings, any status.
async fn mine(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ListingResponse>>> {
    let listings = state
        .listing_service
        .get_user_created_listings(&user.id)
        .await?;
    Ok(ApiResponse::ok(listings.into_iter().map(Into::into).collect()))
}

/// Get a listing for editing (owner only, any status).
async fn show_for_edit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ListingResponse>> {
    let listing = state.listing_service.get_for_edit(&user.id, &id).await?;
    Ok(ApiResponse::ok(listing.into()))
}

/// Moderation message response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationMessageResponse {
    pub id: String,
    pub listing_id: String,
    pub text: String,
    pub sender_id: String,
    pub sender_name: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<vitrine_db::entities::moderation_message::Model> for ModerationMessageResponse {
    fn from(m: vitrine_db::entities::moderation_message::Model) -> Self {
        Self {
            id: m.id,
            listing_id: m.listing_id,
            text: m.text,
            sender_id: m.sender_id,
            sender_name: m.sender_name,
            is_read: m.is_read,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Get the moderation feedback for a listing (owner or admin).
async fn moderation_messages(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<ModerationMessageResponse>>> {
    let messages = state
        .moderation_service
        .get_moderation_messages(&user.id, &id)
        .await?;
    Ok(ApiResponse::ok(messages.into_iter().map(Into::into).collect()))
}

/// Mark-read request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkMessageReadRequest {
    pub message_id: String,
}

/// Mark a moderation message as read (owner only).
async fn mark_message_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<MarkMessageReadRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .moderation_service
        .mark_message_read(&user.id, &req.message_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(browse))
        .route("/create", post(create))
        .route("/update", post(update))
        .route("/delete", post(delete))
        .route("/mine", get(mine))
        .route("/moderation-messages/read", post(mark_message_read))
        .route("/{id}", get(show))
        .route("/{id}/edit", get(show_for_edit))
        .route("/{id}/moderation-messages", get(moderation_messages))
}
