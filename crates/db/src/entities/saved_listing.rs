//! Saved listing entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A listing bookmarked by a user.
///
/// Carries a title snapshot so the bookmark stays renderable after the
/// listing itself is deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "saved_listing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub listing_id: String,

    /// Listing title at save time.
    pub title: String,

    pub saved_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
