//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    pub username_lower: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Access token
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    /// Display name
    #[sea_orm(nullable)]
    pub name: Option<String>,

    /// Contact phone number
    #[sea_orm(nullable)]
    pub phone: Option<String>,

    /// Whether the phone number passed verification
    #[sea_orm(default_value = false)]
    pub phone_verified: bool,

    /// Postal code (CEP)
    #[sea_orm(nullable)]
    pub postal_code: Option<String>,

    #[sea_orm(nullable)]
    pub street: Option<String>,

    #[sea_orm(nullable)]
    pub street_number: Option<String>,

    #[sea_orm(nullable)]
    pub complement: Option<String>,

    #[sea_orm(nullable)]
    pub city: Option<String>,

    #[sea_orm(nullable)]
    pub state: Option<String>,

    /// Is this user an admin?
    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    /// Number of reviews received (denormalized, written only inside the
    /// review-submission transaction)
    #[sea_orm(default_value = 0)]
    pub review_count: i32,

    /// Arithmetic mean of all received ratings. 0.0 until the first
    /// review, then always within [1, 5].
    #[sea_orm(default_value = 0.0)]
    pub average_rating: f64,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::listing::Entity")]
    Listings,

    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listings.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
