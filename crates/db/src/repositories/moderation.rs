//! Moderation repository.

use std::sync::Arc;

use crate::entities::listing::ListingStatus;
use crate::entities::{Listing, ModerationMessage, listing, moderation_message};
use vitrine_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};

fn map_txn_err(e: &DbErr) -> AppError {
    if matches!(e, DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) {
        AppError::Unavailable(e.to_string())
    } else {
        AppError::Database(e.to_string())
    }
}

/// Moderation repository for database operations.
#[derive(Clone)]
pub struct ModerationRepository {
    db: Arc<DatabaseConnection>,
}

impl ModerationRepository {
    /// Create a new moderation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Reject a listing and attach the admin's feedback in one
    /// transaction.
    ///
    /// The status flip and the message insert commit together or not at
    /// all; a partially applied rejection is never observable. Returns
    /// the updated listing and the status it had before.
    pub async fn reject_with_feedback(
        &self,
        listing_id: &str,
        message: moderation_message::ActiveModel,
    ) -> AppResult<(listing::Model, ListingStatus)> {
        let listing_id = listing_id.to_string();
        let result = self
            .db
            .transaction::<_, (listing::Model, ListingStatus), AppError>(move |txn| {
                Box::pin(async move {
                    let listing = Listing::find_by_id(&listing_id)
                        .one(txn)
                        .await
                        .map_err(|e| map_txn_err(&e))?
                        .ok_or_else(|| AppError::ListingNotFound(listing_id.clone()))?;

                    let previous_status = listing.status;

                    let mut active: listing::ActiveModel = listing.into();
                    active.status = Set(ListingStatus::Rejected);
                    active.updated_at = Set(Some(chrono::Utc::now().into()));
                    let updated = active.update(txn).await.map_err(|e| map_txn_err(&e))?;

                    message.insert(txn).await.map_err(|e| map_txn_err(&e))?;

                    Ok((updated, previous_status))
                })
            })
            .await;

        match result {
            Ok(value) => Ok(value),
            Err(TransactionError::Connection(e)) => Err(map_txn_err(&e)),
            Err(TransactionError::Transaction(e)) => Err(e),
        }
    }

    /// Get the moderation messages for a listing, in creation order.
    pub async fn find_messages_by_listing(
        &self,
        listing_id: &str,
    ) -> AppResult<Vec<moderation_message::Model>> {
        ModerationMessage::find()
            .filter(moderation_message::Column::ListingId.eq(listing_id))
            .order_by_asc(moderation_message::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a moderation message by ID.
    pub async fn find_message_by_id(
        &self,
        message_id: &str,
    ) -> AppResult<Option<moderation_message::Model>> {
        ModerationMessage::find_by_id(message_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark a moderation message as read.
    pub async fn mark_message_read(&self, message_id: &str) -> AppResult<()> {
        let message = ModerationMessage::find_by_id(message_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Moderation message: {message_id}")))?;

        if message.is_read {
            return Ok(());
        }

        let mut active: moderation_message::ActiveModel = message.into();
        active.is_read = Set(true);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_message(id: &str, listing_id: &str, text: &str) -> moderation_message::Model {
        moderation_message::Model {
            id: id.to_string(),
            listing_id: listing_id.to_string(),
            text: text.to_string(),
            sender_id: "admin1".to_string(),
            sender_name: "Administração".to_string(),
            is_read: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_messages_by_listing() {
        let m1 = create_test_message("m1", "l1", "Fotos de baixa qualidade");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[m1]])
                .into_connection(),
        );

        let repo = ModerationRepository::new(db);
        let result = repo.find_messages_by_listing("l1").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "Fotos de baixa qualidade");
    }

    #[tokio::test]
    async fn test_mark_message_read_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<moderation_message::Model>::new()])
                .into_connection(),
        );

        let repo = ModerationRepository::new(db);
        let result = repo.mark_message_read("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
