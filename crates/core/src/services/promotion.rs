//! Promotion service.
//!
//! The single entry point through which a listing can become featured:
//! a confirmed payment from the gateway. No user-facing operation writes
//! the promotion fields.

use chrono::Duration;
use vitrine_common::{AppError, AppResult, config::FeaturingConfig};
use vitrine_db::repositories::{PaymentOutcome, PromotionRepository};
use serde::Deserialize;

/// A payment-confirmation webhook event, already signature-verified by
/// the transport layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    /// Gateway payment/session id; the idempotency key.
    pub session_id: String,
    pub listing_id: String,
    pub amount_confirmed_cents: i64,
}

/// Promotion service for business logic.
#[derive(Clone)]
pub struct PromotionService {
    promotion_repo: PromotionRepository,
    duration: Duration,
}

impl PromotionService {
    /// Create a new promotion service.
    #[must_use]
    pub fn new(promotion_repo: PromotionRepository, config: &FeaturingConfig) -> Self {
        Self {
            promotion_repo,
            duration: Duration::days(config.duration_days),
        }
    }

    /// Apply a confirmed featuring payment.
    ///
    /// Idempotent under at-least-once delivery: replays of the same
    /// session id change nothing. A new session on an already-featured
    /// listing extends the window from its current end.
    pub async fn on_payment_confirmed(
        &self,
        event: PaymentConfirmation,
    ) -> AppResult<PaymentOutcome> {
        if event.session_id.trim().is_empty() {
            return Err(AppError::Validation("Payment session id is required".to_string()));
        }
        if event.listing_id.trim().is_empty() {
            return Err(AppError::Validation("Listing id is required".to_string()));
        }

        let outcome = self
            .promotion_repo
            .apply_confirmed_payment(
                &event.session_id,
                &event.listing_id,
                event.amount_confirmed_cents,
                self.duration,
            )
            .await?;

        match &outcome {
            PaymentOutcome::Applied(listing) => {
                tracing::info!(
                    listing_id = %listing.id,
                    session_id = %event.session_id,
                    featured_until = ?listing.featured_until,
                    "Listing featured"
                );
            }
            PaymentOutcome::Duplicate(payment) => {
                tracing::info!(
                    listing_id = %payment.listing_id,
                    session_id = %event.session_id,
                    "Duplicate payment confirmation ignored"
                );
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vitrine_db::entities::featured_payment;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn confirmation(session_id: &str) -> PaymentConfirmation {
        PaymentConfirmation {
            session_id: session_id.to_string(),
            listing_id: "l1".to_string(),
            amount_confirmed_cents: 1000,
        }
    }

    #[tokio::test]
    async fn test_empty_session_id_is_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = PromotionService::new(
            PromotionRepository::new(db),
            &FeaturingConfig::default(),
        );

        let result = service.on_payment_confirmed(confirmation("  ")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_replayed_session_is_a_no_op() {
        let applied = featured_payment::Model {
            session_id: "cs_123".to_string(),
            listing_id: "l1".to_string(),
            amount_cents: 1000,
            featured_until: Utc::now().into(),
            received_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[applied]])
                .into_connection(),
        );
        let service = PromotionService::new(
            PromotionRepository::new(db),
            &FeaturingConfig::default(),
        );

        let outcome = service
            .on_payment_confirmed(confirmation("cs_123"))
            .await
            .unwrap();

        assert!(matches!(outcome, PaymentOutcome::Duplicate(_)));
    }
}
