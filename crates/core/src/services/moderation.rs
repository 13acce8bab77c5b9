//! Moderation service for the listing review workflow.

use crate::services::event_publisher::{EventPublisherService, ListingSnapshot};
use vitrine_common::{AppError, AppResult, IdGenerator};
use vitrine_db::{
    entities::{listing, moderation_message},
    entities::listing::ListingStatus,
    entities::site_counter::APPROVED_LISTING_COUNT,
    repositories::{CounterRepository, ListingRepository, ModerationRepository, UserRepository},
};
use sea_orm::Set;

/// Display label attached to admin feedback.
const ADMIN_SENDER_NAME: &str = "Administração";

/// Moderation service for business logic.
#[derive(Clone)]
pub struct ModerationService {
    moderation_repo: ModerationRepository,
    listing_repo: ListingRepository,
    user_repo: UserRepository,
    counter_repo: CounterRepository,
    event_publisher: Option<EventPublisherService>,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(
        moderation_repo: ModerationRepository,
        listing_repo: ListingRepository,
        user_repo: UserRepository,
        counter_repo: CounterRepository,
    ) -> Self {
        Self {
            moderation_repo,
            listing_repo,
            user_repo,
            counter_repo,
            event_publisher: None,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the event publisher.
    pub fn set_event_publisher(&mut self, event_publisher: EventPublisherService) {
        self.event_publisher = Some(event_publisher);
    }

    async fn require_admin(&self, user_id: &str) -> AppResult<vitrine_db::entities::user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;
        if !user.is_admin {
            return Err(AppError::Forbidden(
                "Only admins can moderate listings".to_string(),
            ));
        }
        Ok(user)
    }

    /// Approve a listing.
    ///
    /// Idempotent: approving an already approved listing only refreshes
    /// its timestamp. The approved-listing counter moves only on a
    /// genuine transition, via an atomic increment.
    pub async fn approve(&self, admin_id: &str, listing_id: &str) -> AppResult<listing::Model> {
        self.require_admin(admin_id).await?;

        // Surface NotFound before the no-op UPDATE would hide it.
        self.listing_repo.get_by_id(listing_id).await?;

        let transitioned = self.listing_repo.approve(listing_id).await?;
        if transitioned {
            self.counter_repo.increment(APPROVED_LISTING_COUNT).await?;
        }

        let listing = self.listing_repo.get_by_id(listing_id).await?;

        tracing::info!(listing_id, admin_id, transitioned, "Listing approved");

        if let Some(ref publisher) = self.event_publisher
            && let Err(e) = publisher
                .publish_listing_updated(&ListingSnapshot::from(&listing))
                .await
        {
            tracing::warn!(error = %e, listing_id, "Failed to publish listing updated event");
        }

        Ok(listing)
    }

    /// Reject a listing, attaching feedback for the owner.
    ///
    /// The status flip and the feedback message are one atomic unit; the
    /// empty-message check happens before any write.
    pub async fn reject_with_feedback(
        &self,
        admin_id: &str,
        listing_id: &str,
        message: &str,
    ) -> AppResult<listing::Model> {
        let admin = self.require_admin(admin_id).await?;

        let text = message.trim();
        if text.is_empty() {
            return Err(AppError::Validation(
                "Rejection feedback is required".to_string(),
            ));
        }

        let message_model = moderation_message::ActiveModel {
            id: Set(self.id_gen.generate()),
            listing_id: Set(listing_id.to_string()),
            text: Set(text.to_string()),
            sender_id: Set(admin.id),
            sender_name: Set(admin
                .name
                .unwrap_or_else(|| ADMIN_SENDER_NAME.to_string())),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        let (listing, previous_status) = self
            .moderation_repo
            .reject_with_feedback(listing_id, message_model)
            .await?;

        // A previously approved listing leaves the public pool.
        if previous_status == ListingStatus::Approved {
            self.counter_repo.decrement(APPROVED_LISTING_COUNT).await?;
        }

        tracing::info!(listing_id, admin_id, "Listing rejected with feedback");

        if let Some(ref publisher) = self.event_publisher
            && let Err(e) = publisher
                .publish_listing_updated(&ListingSnapshot::from(&listing))
                .await
        {
            tracing::warn!(error = %e, listing_id, "Failed to publish listing updated event");
        }

        Ok(listing)
    }

    /// Get listings awaiting review.
    pub async fn get_pending_listings(
        &self,
        admin_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<listing::Model>> {
        self.require_admin(admin_id).await?;
        self.listing_repo.find_pending(limit, offset).await
    }

    /// Get the moderation messages for a listing, in creation order.
    /// Visible to the listing owner and admins.
    pub async fn get_moderation_messages(
        &self,
        caller_id: &str,
        listing_id: &str,
    ) -> AppResult<Vec<moderation_message::Model>> {
        let caller = self.user_repo.get_by_id(caller_id).await?;
        let listing = self.listing_repo.get_by_id(listing_id).await?;

        if listing.owner_id != caller.id && !caller.is_admin {
            return Err(AppError::Forbidden(
                "Moderation feedback is only visible to the owner".to_string(),
            ));
        }

        self.moderation_repo
            .find_messages_by_listing(listing_id)
            .await
    }

    /// Get the application-wide counters. Admin only.
    pub async fn get_site_stats(&self, admin_id: &str) -> AppResult<(i64, i64)> {
        use vitrine_db::entities::site_counter::USER_COUNT;

        self.require_admin(admin_id).await?;
        let user_count = self.counter_repo.get(USER_COUNT).await?;
        let approved_listing_count = self.counter_repo.get(APPROVED_LISTING_COUNT).await?;
        Ok((user_count, approved_listing_count))
    }

    /// Mark a moderation message as read. Listing owner only.
    pub async fn mark_message_read(&self, caller_id: &str, message_id: &str) -> AppResult<()> {
        let message = self
            .moderation_repo
            .find_message_by_id(message_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Moderation message: {message_id}")))?;

        let listing = self.listing_repo.get_by_id(&message.listing_id).await?;
        if listing.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Moderation feedback is only visible to the owner".to_string(),
            ));
        }

        self.moderation_repo.mark_message_read(message_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vitrine_db::entities::user;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: &str, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: "mod".to_string(),
            username_lower: "mod".to_string(),
            email: "mod@example.com".to_string(),
            password_hash: "hash".to_string(),
            token: None,
            name: None,
            phone: None,
            phone_verified: false,
            postal_code: None,
            street: None,
            street_number: None,
            complement: None,
            city: None,
            state: None,
            is_admin,
            review_count: 0,
            average_rating: 0.0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: Arc<DatabaseConnection>) -> ModerationService {
        ModerationService::new(
            ModerationRepository::new(db.clone()),
            ListingRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            CounterRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_reject_requires_admin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("u1", false)]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .reject_with_feedback("u1", "l1", "low quality photos")
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_reject_requires_non_empty_feedback() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("admin1", true)]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.reject_with_feedback("admin1", "l1", "   ").await;

        // Rejected before any transaction begins.
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
