//! Messaging endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use vitrine_common::AppResult;
use vitrine_core::ConversationSummary;
use vitrine_db::entities::{conversation, message};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

const fn default_limit() -> u64 {
    50
}

/// Open conversation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenConversationRequest {
    pub listing_id: String,
}

/// Conversation response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: String,
    pub listing_id: String,
    pub participant_ids: Vec<String>,
    pub last_message: String,
    pub last_message_at: String,
}

impl From<conversation::Model> for ConversationResponse {
    fn from(c: conversation::Model) -> Self {
        Self {
            id: c.id,
            listing_id: c.listing_id,
            participant_ids: vec![c.participant_lo_id, c.participant_hi_id],
            last_message: c.last_message,
            last_message_at: c.last_message_at.to_rfc3339(),
        }
    }
}

/// Open (or find) the conversation with a listing's owner.
async fn open_conversation(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<OpenConversationRequest>,
) -> AppResult<ApiResponse<ConversationResponse>> {
    let conversation = state
        .messaging_service
        .get_or_create_conversation(&user.id, &req.listing_id)
        .await?;
    Ok(ApiResponse::ok(conversation.into()))
}

/// Get the caller's conversations, enriched for the inbox.
async fn conversations(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ConversationSummary>>> {
    let summaries = state
        .messaging_service
        .get_user_conversations(&user.id)
        .await?;
    Ok(ApiResponse::ok(summaries))
}

/// Message response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub text: String,
    pub created_at: String,
}

impl From<message::Model> for MessageResponse {
    fn from(m: message::Model) -> Self {
        Self {
            id: m.id,
            conversation_id: m.conversation_id,
            sender_id: m.sender_id,
            text: m.text,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Pagination query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Get the messages of a conversation, oldest first.
async fn messages(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<MessageResponse>>> {
    let messages = state
        .messaging_service
        .get_messages(&user.id, &conversation_id, page.limit.min(200), page.offset)
        .await?;
    Ok(ApiResponse::ok(messages.into_iter().map(Into::into).collect()))
}

/// Send message request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub conversation_id: String,
    pub text: String,
}

/// Send a message in a conversation.
async fn send_message(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<ApiResponse<MessageResponse>> {
    let message = state
        .messaging_service
        .send_message(&user.id, &req.conversation_id, &req.text)
        .await?;
    Ok(ApiResponse::ok(message.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(conversations))
        .route("/conversations/open", post(open_conversation))
        .route("/conversations/{conversation_id}/messages", get(messages))
        .route("/messages/send", post(send_message))
}
