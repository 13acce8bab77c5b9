//! Messaging service for buyer/seller conversations.

use chrono::Utc;
use vitrine_common::{AppError, AppResult, IdGenerator};
use vitrine_db::{
    entities::{conversation, message},
    repositories::{ConversationRepository, ListingRepository, UserRepository},
};
use sea_orm::Set;
use serde::Serialize;

/// Placeholder title for conversations whose listing was deleted.
const REMOVED_LISTING_TITLE: &str = "Anúncio removido";

/// Fallback label for counterparts without a profile name.
const ANONYMOUS_USER_NAME: &str = "Utilizador anónimo";

/// The listing a conversation refers to, or a placeholder when it has
/// been deleted since.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRef {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub removed: bool,
}

impl ListingRef {
    fn removed(listing_id: &str) -> Self {
        Self {
            id: listing_id.to_string(),
            title: REMOVED_LISTING_TITLE.to_string(),
            image_url: None,
            removed: true,
        }
    }
}

/// Conversation summary for the inbox view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: String,
    pub listing: ListingRef,
    pub other_participant_id: String,
    pub other_participant_name: String,
    pub last_message: String,
    pub last_message_at: String,
}

/// Messaging service for business logic.
#[derive(Clone)]
pub struct MessagingService {
    conversation_repo: ConversationRepository,
    listing_repo: ListingRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl MessagingService {
    /// Create a new messaging service.
    #[must_use]
    pub const fn new(
        conversation_repo: ConversationRepository,
        listing_repo: ListingRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            conversation_repo,
            listing_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Open (or find) the conversation between a buyer and the owner of
    /// a listing. The deterministic id makes this idempotent.
    pub async fn get_or_create_conversation(
        &self,
        buyer_id: &str,
        listing_id: &str,
    ) -> AppResult<conversation::Model> {
        let listing = self.listing_repo.get_by_id(listing_id).await?;

        if listing.owner_id == buyer_id {
            return Err(AppError::BadRequest(
                "Cannot open a conversation about your own listing".to_string(),
            ));
        }

        let id = conversation::Model::conversation_id(listing_id, &listing.owner_id, buyer_id);
        let (lo, hi) = if listing.owner_id.as_str() <= buyer_id {
            (listing.owner_id.clone(), buyer_id.to_string())
        } else {
            (buyer_id.to_string(), listing.owner_id.clone())
        };

        let now = Utc::now();
        let model = conversation::ActiveModel {
            id: Set(id),
            listing_id: Set(listing_id.to_string()),
            participant_lo_id: Set(lo),
            participant_hi_id: Set(hi),
            last_message: Set(String::new()),
            last_message_at: Set(now.into()),
            created_at: Set(now.into()),
        };

        self.conversation_repo.get_or_create(model).await
    }

    /// Send a message in a conversation. Participants only.
    pub async fn send_message(
        &self,
        sender_id: &str,
        conversation_id: &str,
        text: &str,
    ) -> AppResult<message::Model> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Message text is required".to_string()));
        }

        let conversation = self
            .conversation_repo
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Conversation: {conversation_id}")))?;

        if !conversation.has_participant(sender_id) {
            return Err(AppError::Forbidden(
                "Only participants can send messages".to_string(),
            ));
        }

        let model = message::ActiveModel {
            id: Set(self.id_gen.generate()),
            conversation_id: Set(conversation_id.to_string()),
            sender_id: Set(sender_id.to_string()),
            text: Set(text.to_string()),
            created_at: Set(Utc::now().into()),
        };

        self.conversation_repo.create_message(model, text).await
    }

    /// Get the messages of a conversation, oldest first. Participants
    /// only.
    pub async fn get_messages(
        &self,
        caller_id: &str,
        conversation_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<message::Model>> {
        let conversation = self
            .conversation_repo
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Conversation: {conversation_id}")))?;

        if !conversation.has_participant(caller_id) {
            return Err(AppError::Forbidden(
                "Only participants can read messages".to_string(),
            ));
        }

        self.conversation_repo
            .find_messages(conversation_id, limit, offset)
            .await
    }

    /// Get a user's conversations enriched for the inbox view.
    ///
    /// A deleted listing becomes a removed-listing placeholder, and a
    /// missing counterpart profile an anonymous label; neither is a hard
    /// failure.
    pub async fn get_user_conversations(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<ConversationSummary>> {
        let conversations = self.conversation_repo.find_by_participant(user_id).await?;

        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let Some(other_id) = conversation.other_participant(user_id) else {
                continue;
            };
            let other_id = other_id.to_string();

            let listing = match self.listing_repo.find_by_id(&conversation.listing_id).await? {
                Some(listing) => ListingRef {
                    id: listing.id,
                    title: listing.title,
                    image_url: listing.image_url,
                    removed: false,
                },
                None => ListingRef::removed(&conversation.listing_id),
            };

            let other_name = self
                .user_repo
                .find_by_id(&other_id)
                .await?
                .and_then(|u| u.name.or(Some(u.username)))
                .unwrap_or_else(|| ANONYMOUS_USER_NAME.to_string());

            summaries.push(ConversationSummary {
                id: conversation.id,
                listing,
                other_participant_id: other_id,
                other_participant_name: other_name,
                last_message: conversation.last_message,
                last_message_at: conversation.last_message_at.to_rfc3339(),
            });
        }

        Ok(summaries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn service_with(db: Arc<DatabaseConnection>) -> MessagingService {
        MessagingService::new(
            ConversationRepository::new(db.clone()),
            ListingRepository::new(db.clone()),
            UserRepository::new(db),
        )
    }

    fn test_conversation(id: &str) -> conversation::Model {
        conversation::Model {
            id: id.to_string(),
            listing_id: "l1".to_string(),
            participant_lo_id: "u1".to_string(),
            participant_hi_id: "u2".to_string(),
            last_message: "Olá".to_string(),
            last_message_at: Utc::now().into(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_send_message_requires_text() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service_with(db);

        let result = service.send_message("u1", "c1", "   ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_send_message_requires_participant() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_conversation("l1_u1_u2")]])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service.send_message("intruder", "l1_u1_u2", "oi").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_get_messages_unknown_conversation() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<conversation::Model>::new()])
                .into_connection(),
        );
        let service = service_with(db);

        let result = service.get_messages("u1", "missing", 50, 0).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
