//! Review entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A rating left by one user for another after a transaction.
///
/// Immutable once created. Rows are inserted only by the
/// review-submission transaction, so a review never exists without its
/// effect already folded into the reviewed user's aggregates.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user being reviewed (owner of the aggregate).
    pub reviewed_user_id: String,

    /// Star rating, integer 1-5.
    pub rating: i32,

    #[sea_orm(column_type = "Text")]
    pub comment: String,

    /// The user who wrote the review.
    pub reviewer_id: String,

    /// Reviewer display name at submission time.
    pub reviewer_name: String,

    /// Listing the transaction happened on.
    pub listing_id: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReviewedUserId",
        to = "super::user::Column::Id"
    )]
    ReviewedUser,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewedUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
