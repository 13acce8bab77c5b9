//! Site counter entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Named application-wide counter.
///
/// Counters are mutated exclusively through single-statement atomic
/// increments; nothing ever reads a counter value to write it back.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "site_counter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,

    #[sea_orm(default_value = 0)]
    pub value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Counter of registered users.
pub const USER_COUNT: &str = "user_count";

/// Counter of currently approved listings.
pub const APPROVED_LISTING_COUNT: &str = "approved_listing_count";
