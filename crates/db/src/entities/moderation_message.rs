//! Moderation message entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Feedback left by an admin when rejecting a listing.
///
/// Created exactly once per rejection event, in the same transaction as
/// the status flip. Immutable afterwards except for the read flag.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "moderation_message")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The listing the feedback is about.
    pub listing_id: String,

    /// Feedback text shown to the owner.
    #[sea_orm(column_type = "Text")]
    pub text: String,

    /// Admin who rejected the listing.
    pub sender_id: String,

    /// Display label for the sender, e.g. "Administração".
    pub sender_name: String,

    /// Whether the owner has seen this message.
    #[sea_orm(default_value = false)]
    pub is_read: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::listing::Entity",
        from = "Column::ListingId",
        to = "super::listing::Column::Id"
    )]
    Listing,
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
