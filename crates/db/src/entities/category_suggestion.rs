//! Category suggestion entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Suggestion review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum SuggestionStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// A category proposed by a user for admin review.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "category_suggestion")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Proposed category name.
    pub category_name: String,

    /// Why the category should exist.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// User who submitted the suggestion.
    pub user_id: String,

    /// Submitter display name at submission time.
    pub user_name: String,

    /// Current status; transitioned by admin action only.
    pub status: SuggestionStatus,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
