//! Reputation service.
//!
//! Validates review submissions and keeps per-user rating aggregates
//! consistent with the full review history through the repository's
//! serializable transaction.

use vitrine_common::{AppError, AppResult, IdGenerator};
use vitrine_db::{
    entities::{review, user},
    repositories::{ReviewInsert, ReviewRepository, UserRepository},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for submitting a review.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewInput {
    /// Star rating, integer 1-5.
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[validate(length(min = 1, max = 2000))]
    pub comment: String,

    /// Listing the transaction happened on.
    pub listing_id: String,
}

/// Public profile of a user, including reputation aggregates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileView {
    pub id: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub review_count: i32,
    /// Absent until the first review lands.
    pub average_rating: Option<f64>,
    pub member_since: String,
}

impl From<user::Model> for UserProfileView {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            city: user.city,
            state: user.state,
            review_count: user.review_count,
            average_rating: (user.review_count > 0).then_some(user.average_rating),
            member_since: user.created_at.to_rfc3339(),
        }
    }
}

/// Reputation service for business logic.
#[derive(Clone)]
pub struct ReputationService {
    review_repo: ReviewRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ReputationService {
    /// Create a new reputation service.
    #[must_use]
    pub const fn new(review_repo: ReviewRepository, user_repo: UserRepository) -> Self {
        Self {
            review_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a review of `reviewed_user_id`.
    ///
    /// Validation happens before any state exists; the insert and the
    /// aggregate fold then commit atomically. Repeat reviews of the same
    /// counterparty are allowed, each an independent data point. On
    /// `Conflict` the caller retries the whole call.
    pub async fn submit_review(
        &self,
        reviewer_id: &str,
        reviewed_user_id: &str,
        input: SubmitReviewInput,
    ) -> AppResult<review::Model> {
        input.validate()?;

        if input.comment.trim().is_empty() {
            return Err(AppError::Validation("Review comment is required".to_string()));
        }

        if reviewer_id == reviewed_user_id {
            return Err(AppError::Validation("Cannot review yourself".to_string()));
        }

        let reviewer = self.user_repo.get_by_id(reviewer_id).await?;
        let reviewer_name = reviewer.name.unwrap_or(reviewer.username);

        let insert = ReviewInsert {
            id: self.id_gen.generate(),
            reviewed_user_id: reviewed_user_id.to_string(),
            rating: input.rating,
            comment: input.comment.trim().to_string(),
            reviewer_id: reviewer_id.to_string(),
            reviewer_name,
            listing_id: input.listing_id,
        };

        let (review, reviewed) = self.review_repo.submit(insert).await?;

        tracing::info!(
            reviewed_user_id,
            reviewer_id,
            rating = review.rating,
            review_count = reviewed.review_count,
            "Review submitted"
        );

        Ok(review)
    }

    /// Get the reviews a user has received, newest first.
    pub async fn get_user_reviews(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<review::Model>> {
        self.review_repo
            .find_by_reviewed_user(user_id, limit, offset)
            .await
    }

    /// Get a user's public profile with reputation aggregates.
    pub async fn get_user_profile(&self, user_id: &str) -> AppResult<UserProfileView> {
        let user = self.user_repo.get_by_id(user_id).await?;
        Ok(user.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service() -> ReputationService {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );
        ReputationService::new(ReviewRepository::new(db.clone()), UserRepository::new(db))
    }

    fn input(rating: i32, comment: &str) -> SubmitReviewInput {
        SubmitReviewInput {
            rating,
            comment: comment.to_string(),
            listing_id: "l1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_rating_out_of_range_is_rejected() {
        let service = service();

        let result = service.submit_review("u2", "u1", input(0, "ok")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service.submit_review("u2", "u1", input(6, "ok")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_blank_comment_is_rejected() {
        let service = service();
        let result = service.submit_review("u2", "u1", input(5, "   ")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_self_review_is_rejected() {
        let service = service();
        let result = service.submit_review("u1", "u1", input(5, "great")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_profile_hides_average_without_reviews() {
        let user = user::Model {
            id: "u1".to_string(),
            username: "maria".to_string(),
            username_lower: "maria".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: "hash".to_string(),
            token: None,
            name: Some("Maria".to_string()),
            phone: None,
            phone_verified: false,
            postal_code: None,
            street: None,
            street_number: None,
            complement: None,
            city: None,
            state: None,
            is_admin: false,
            review_count: 0,
            average_rating: 0.0,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let view = UserProfileView::from(user);
        assert_eq!(view.review_count, 0);
        assert!(view.average_rating.is_none());
    }
}
