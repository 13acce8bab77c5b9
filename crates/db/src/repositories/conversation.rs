//! Conversation repository.

use std::sync::Arc;

use crate::entities::{Conversation, Message, conversation, message};
use vitrine_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, sea_query::OnConflict,
};

/// Conversation repository for database operations.
#[derive(Clone)]
pub struct ConversationRepository {
    db: Arc<DatabaseConnection>,
}

impl ConversationRepository {
    /// Create a new conversation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a conversation by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<conversation::Model>> {
        Conversation::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a conversation unless its deterministic id already exists,
    /// then return the stored row either way.
    pub async fn get_or_create(
        &self,
        model: conversation::ActiveModel,
    ) -> AppResult<conversation::Model> {
        let id = match &model.id {
            Set(id) => id.clone(),
            _ => return Err(AppError::Internal("Conversation id not set".to_string())),
        };

        Conversation::insert(model)
            .on_conflict(
                OnConflict::column(conversation::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Conversation: {id}")))
    }

    /// Get a user's conversations, most recent activity first.
    pub async fn find_by_participant(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<conversation::Model>> {
        Conversation::find()
            .filter(
                Condition::any()
                    .add(conversation::Column::ParticipantLoId.eq(user_id))
                    .add(conversation::Column::ParticipantHiId.eq(user_id)),
            )
            .order_by_desc(conversation::Column::LastMessageAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Append a message and refresh the conversation preview.
    pub async fn create_message(
        &self,
        model: message::ActiveModel,
        preview: &str,
    ) -> AppResult<message::Model> {
        let saved = model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let conversation = self
            .find_by_id(&saved.conversation_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Conversation: {}", saved.conversation_id))
            })?;

        let mut active: conversation::ActiveModel = conversation.into();
        active.last_message = Set(preview.to_string());
        active.last_message_at = Set(saved.created_at);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(saved)
    }

    /// Get the messages of a conversation, oldest first.
    pub async fn find_messages(
        &self,
        conversation_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<message::Model>> {
        Message::find()
            .filter(message::Column::ConversationId.eq(conversation_id))
            .order_by_asc(message::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_conversation(id: &str) -> conversation::Model {
        conversation::Model {
            id: id.to_string(),
            listing_id: "l1".to_string(),
            participant_lo_id: "u1".to_string(),
            participant_hi_id: "u2".to_string(),
            last_message: String::new(),
            last_message_at: Utc::now().into(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_participant() {
        let c1 = create_test_conversation("l1_u1_u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1]])
                .into_connection(),
        );

        let repo = ConversationRepository::new(db);
        let result = repo.find_by_participant("u1").await.unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].has_participant("u1"));
    }

    #[tokio::test]
    async fn test_find_messages() {
        let m1 = message::Model {
            id: "m1".to_string(),
            conversation_id: "l1_u1_u2".to_string(),
            sender_id: "u1".to_string(),
            text: "Ainda está disponível?".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[m1]])
                .into_connection(),
        );

        let repo = ConversationRepository::new(db);
        let result = repo.find_messages("l1_u1_u2", 50, 0).await.unwrap();

        assert_eq!(result.len(), 1);
    }
}
