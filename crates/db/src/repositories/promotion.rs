//! Promotion repository.
//!
//! Applies confirmed featuring payments. Idempotency is keyed on the
//! upstream payment session id (not the listing id, which can
//! legitimately be re-featured later): the ledger insert and the listing
//! update commit in one transaction, so a replayed webhook either finds
//! the ledger row or collides on its primary key, and never extends the
//! promotion twice.

use std::sync::Arc;

use crate::entities::listing::ListingStatus;
use crate::entities::{FeaturedPayment, Listing, featured_payment, listing};
use vitrine_common::{AppError, AppResult};
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set, TransactionError,
    TransactionTrait,
};

/// Result of applying a payment confirmation.
#[derive(Debug, Clone)]
pub enum PaymentOutcome {
    /// The payment was applied and the listing is now featured.
    Applied(listing::Model),
    /// This session id was applied before; nothing changed.
    Duplicate(featured_payment::Model),
}

fn map_txn_err(e: &DbErr) -> AppError {
    if matches!(e, DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) {
        AppError::Unavailable(e.to_string())
    } else {
        AppError::Database(e.to_string())
    }
}

fn is_duplicate_key(e: &AppError) -> bool {
    match e {
        AppError::Database(message) => {
            message.contains("duplicate key") || message.contains("23505")
        }
        _ => false,
    }
}

/// Promotion repository for database operations.
#[derive(Clone)]
pub struct PromotionRepository {
    db: Arc<DatabaseConnection>,
}

impl PromotionRepository {
    /// Create a new promotion repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Apply a confirmed featuring payment.
    ///
    /// A repeat featuring of a still-featured listing extends from the
    /// current `featured_until`; otherwise the window starts now.
    pub async fn apply_confirmed_payment(
        &self,
        session_id: &str,
        listing_id: &str,
        amount_cents: i64,
        duration: Duration,
    ) -> AppResult<PaymentOutcome> {
        let session_id = session_id.to_string();
        let listing_id = listing_id.to_string();
        let session_for_recovery = session_id.clone();

        let result = self
            .db
            .transaction::<_, PaymentOutcome, AppError>(move |txn| {
                Box::pin(async move {
                    if let Some(existing) = FeaturedPayment::find_by_id(&session_id)
                        .one(txn)
                        .await
                        .map_err(|e| map_txn_err(&e))?
                    {
                        return Ok(PaymentOutcome::Duplicate(existing));
                    }

                    let listing = Listing::find_by_id(&listing_id)
                        .one(txn)
                        .await
                        .map_err(|e| map_txn_err(&e))?
                        .ok_or_else(|| AppError::ListingNotFound(listing_id.clone()))?;

                    if listing.status != ListingStatus::Approved {
                        return Err(AppError::Validation(
                            "Only approved listings can be featured".to_string(),
                        ));
                    }

                    let now = Utc::now();
                    let base = listing
                        .featured_until
                        .map(|until| until.with_timezone(&Utc))
                        .filter(|until| listing.is_featured && *until > now)
                        .unwrap_or(now);
                    let new_until = base + duration;

                    let mut active: listing::ActiveModel = listing.into();
                    active.is_featured = Set(true);
                    active.featured_until = Set(Some(new_until.into()));
                    active.updated_at = Set(Some(now.into()));
                    let updated = active.update(txn).await.map_err(|e| map_txn_err(&e))?;

                    let ledger = featured_payment::ActiveModel {
                        session_id: Set(session_id),
                        listing_id: Set(listing_id),
                        amount_cents: Set(amount_cents),
                        featured_until: Set(new_until.into()),
                        received_at: Set(now.into()),
                    };
                    ledger.insert(txn).await.map_err(|e| map_txn_err(&e))?;

                    Ok(PaymentOutcome::Applied(updated))
                })
            })
            .await;

        match result {
            Ok(outcome) => Ok(outcome),
            Err(TransactionError::Connection(e)) => Err(map_txn_err(&e)),
            Err(TransactionError::Transaction(e)) if is_duplicate_key(&e) => {
                // Lost the race against a concurrent delivery of the same
                // session: the other transaction's result stands.
                let existing = self
                    .find_payment(session_for_recovery.as_str())
                    .await?
                    .ok_or(e)?;
                Ok(PaymentOutcome::Duplicate(existing))
            }
            Err(TransactionError::Transaction(e)) => Err(e),
        }
    }

    /// Find an applied payment by session id.
    pub async fn find_payment(
        &self,
        session_id: &str,
    ) -> AppResult<Option<featured_payment::Model>> {
        FeaturedPayment::find_by_id(session_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_detection() {
        let dup = AppError::Database(
            "duplicate key value violates unique constraint \"featured_payment_pkey\""
                .to_string(),
        );
        assert!(is_duplicate_key(&dup));

        let other = AppError::Database("syntax error".to_string());
        assert!(!is_duplicate_key(&other));

        let validation = AppError::Validation("x".to_string());
        assert!(!is_duplicate_key(&validation));
    }
}
