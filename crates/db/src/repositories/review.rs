//! Review repository.
//!
//! Home of the reputation transaction: inserting a review and folding it
//! into the reviewed user's `(review_count, average_rating)` aggregates
//! must commit together or not at all, serialized against concurrent
//! submissions for the same user.

use std::sync::Arc;

use crate::entities::{Review, User, review, user};
use vitrine_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IsolationLevel,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionError, TransactionTrait,
};

/// How many times a serialization failure is retried before surfacing
/// `Conflict` to the caller.
const MAX_ATTEMPTS: u32 = 5;

/// Input for inserting a review.
#[derive(Debug, Clone)]
pub struct ReviewInsert {
    pub id: String,
    pub reviewed_user_id: String,
    pub rating: i32,
    pub comment: String,
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub listing_id: String,
}

/// Fold one more rating into a running `(count, average)` pair.
#[must_use]
pub fn fold_rating(review_count: i32, average_rating: f64, rating: i32) -> (i32, f64) {
    let new_count = review_count + 1;
    let new_average =
        (average_rating * f64::from(review_count) + f64::from(rating)) / f64::from(new_count);
    (new_count, new_average)
}

fn map_txn_err(e: &DbErr) -> AppError {
    let message = e.to_string();
    // Postgres serialization_failure (40001) and deadlock_detected
    // (40P01) both mean "re-run the transaction".
    if message.contains("40001")
        || message.contains("could not serialize access")
        || message.contains("deadlock detected")
    {
        AppError::Conflict(message)
    } else if matches!(e, DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) {
        AppError::Unavailable(message)
    } else {
        AppError::Database(message)
    }
}

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a review and update the reviewed user's aggregates in one
    /// serializable transaction.
    ///
    /// Serialization failures are retried up to [`MAX_ATTEMPTS`] times;
    /// after that the caller gets `Conflict` and retries the whole
    /// operation. The aggregates are never recomputed by the caller.
    pub async fn submit(&self, input: ReviewInsert) -> AppResult<(review::Model, user::Model)> {
        let mut last_err = AppError::Conflict("review submission did not commit".to_string());

        for attempt in 1..=MAX_ATTEMPTS {
            let input = input.clone();
            let result = self
                .db
                .transaction_with_config::<_, (review::Model, user::Model), AppError>(
                    move |txn| {
                        Box::pin(async move {
                            let reviewed = User::find_by_id(&input.reviewed_user_id)
                                .one(txn)
                                .await
                                .map_err(|e| map_txn_err(&e))?
                                .ok_or_else(|| {
                                    AppError::UserNotFound(input.reviewed_user_id.clone())
                                })?;

                            let (new_count, new_average) = fold_rating(
                                reviewed.review_count,
                                reviewed.average_rating,
                                input.rating,
                            );

                            let now = chrono::Utc::now();
                            let review_model = review::ActiveModel {
                                id: Set(input.id),
                                reviewed_user_id: Set(input.reviewed_user_id),
                                rating: Set(input.rating),
                                comment: Set(input.comment),
                                reviewer_id: Set(input.reviewer_id),
                                reviewer_name: Set(input.reviewer_name),
                                listing_id: Set(input.listing_id),
                                created_at: Set(now.into()),
                            };
                            let saved = review_model
                                .insert(txn)
                                .await
                                .map_err(|e| map_txn_err(&e))?;

                            let mut aggregate: user::ActiveModel = reviewed.into();
                            aggregate.review_count = Set(new_count);
                            aggregate.average_rating = Set(new_average);
                            aggregate.updated_at = Set(Some(now.into()));
                            let updated = aggregate
                                .update(txn)
                                .await
                                .map_err(|e| map_txn_err(&e))?;

                            Ok((saved, updated))
                        })
                    },
                    Some(IsolationLevel::Serializable),
                    None,
                )
                .await;

            let err = match result {
                Ok(value) => return Ok(value),
                Err(TransactionError::Connection(e)) => map_txn_err(&e),
                Err(TransactionError::Transaction(e)) => e,
            };

            match err {
                AppError::Conflict(_) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(attempt, "Review transaction serialization failure, retrying");
                    last_err = err;
                }
                other => return Err(other),
            }
        }

        Err(last_err)
    }

    /// Get all reviews received by a user, newest first.
    pub async fn find_by_reviewed_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<review::Model>> {
        Review::find()
            .filter(review::Column::ReviewedUserId.eq(user_id))
            .order_by_desc(review::Column::CreatedAt)
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

    #[test]
    fn test_fold_first_review() {
        // A five-star review on a fresh user.
        assert_eq!(fold_rating(0, 0.0, 5), (1, 5.0));
    }

    #[test]
    fn test_fold_second_review() {
        let (count, average) = fold_rating(1, 5.0, 1);
        assert_eq!(count, 2);
        assert_eq!(average, 3.0);
    }

    #[test]
    fn test_fold_order_independent_result() {
        // Two concurrent reviews (4 then 2, or 2 then 4) converge on the
        // same aggregates once serialized.
        let (c1, a1) = fold_rating(0, 0.0, 4);
        let (c2, a2) = fold_rating(c1, a1, 2);

        let (d1, b1) = fold_rating(0, 0.0, 2);
        let (d2, b2) = fold_rating(d1, b1, 4);

        assert_eq!((c2, a2), (2, 3.0));
        assert_eq!((d2, b2), (2, 3.0));
    }

    #[test]
    fn test_fold_stays_within_bounds() {
        let mut state = (0, 0.0);
        for rating in [5, 4, 3, 2, 1, 5, 5] {
            state = fold_rating(state.0, state.1, rating);
            assert!(state.1 >= 1.0 && state.1 <= 5.0);
        }
        assert_eq!(state.0, 7);
    }

    #[test]
    fn test_map_txn_err_serialization() {
        let err = DbErr::Custom(
            "error returned from database: could not serialize access due to concurrent update"
                .to_string(),
        );
        assert!(matches!(map_txn_err(&err), AppError::Conflict(_)));
    }

    #[test]
    fn test_map_txn_err_other() {
        let err = DbErr::Custom("duplicate key value".to_string());
        assert!(matches!(map_txn_err(&err), AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_find_by_reviewed_user() {
        let review = review::Model {
            id: "r1".to_string(),
            reviewed_user_id: "u1".to_string(),
            rating: 5,
            comment: "Ótimo vendedor".to_string(),
            reviewer_id: "u2".to_string(),
            reviewer_name: "João".to_string(),
            listing_id: "l1".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[review]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.find_by_reviewed_user("u1", 20, 0).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].rating, 5);
    }
}
