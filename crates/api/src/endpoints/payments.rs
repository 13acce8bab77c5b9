//! Payment webhook endpoints.
//!
//! The gateway delivers confirmations at-least-once; signature
//! verification happens upstream (reverse proxy / gateway SDK), so the
//! handler only has to apply the event idempotently.

use axum::{Json, Router, extract::State, routing::post};
use vitrine_common::AppResult;
use vitrine_core::PaymentConfirmation;
use vitrine_db::repositories::PaymentOutcome;
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Webhook acknowledgement.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    /// False when this delivery was a replay of an applied session.
    pub applied: bool,
    pub listing_id: String,
    pub featured_until: String,
}

/// Apply a payment confirmation.
async fn confirm(
    State(state): State<AppState>,
    Json(event): Json<PaymentConfirmation>,
) -> AppResult<ApiResponse<WebhookAck>> {
    let outcome = state.promotion_service.on_payment_confirmed(event).await?;

    let ack = match outcome {
        PaymentOutcome::Applied(listing) => WebhookAck {
            applied: true,
            featured_until: listing
                .featured_until
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            listing_id: listing.id,
        },
        PaymentOutcome::Duplicate(payment) => WebhookAck {
            applied: false,
            featured_until: payment.featured_until.to_rfc3339(),
            listing_id: payment.listing_id,
        },
    };

    Ok(ApiResponse::ok(ack))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(confirm))
}
