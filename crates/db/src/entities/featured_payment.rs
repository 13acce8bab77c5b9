//! Featured payment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Idempotency ledger for payment-confirmation webhooks.
///
/// One row per gateway payment session that has been applied. The
/// session id is the primary key: at-least-once delivery of the same
/// confirmation finds the row and becomes a no-op instead of extending
/// the promotion twice.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "featured_payment")]
pub struct Model {
    /// Payment/session id from the upstream gateway.
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: String,

    /// Listing the payment featured.
    pub listing_id: String,

    /// Confirmed amount, in cents.
    pub amount_cents: i64,

    /// The `featured_until` value this payment produced.
    pub featured_until: DateTimeWithTimeZone,

    pub received_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
