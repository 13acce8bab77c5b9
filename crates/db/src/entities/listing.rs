//! Listing entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Listing moderation status.
///
/// Every listing is created as `Pending`. Admin review moves it to
/// `Approved` or `Rejected`; the two review outcomes stay
/// admin-reversible, there is no further state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ListingStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Marketplace category of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ListingCategory {
    #[sea_orm(string_value = "negocios")]
    #[serde(rename = "negocios")]
    Business,
    #[sea_orm(string_value = "imoveis")]
    #[serde(rename = "imoveis")]
    RealEstate,
    #[sea_orm(string_value = "veiculos")]
    #[serde(rename = "veiculos")]
    Vehicles,
    #[sea_orm(string_value = "eletronicos")]
    #[serde(rename = "eletronicos")]
    Electronics,
    #[sea_orm(string_value = "roupas")]
    #[serde(rename = "roupas")]
    Apparel,
    #[sea_orm(string_value = "servicos")]
    #[serde(rename = "servicos")]
    Services,
    #[sea_orm(string_value = "casa_e_jardim")]
    #[serde(rename = "casa_e_jardim")]
    HomeAndGarden,
    #[sea_orm(string_value = "empregos")]
    #[serde(rename = "empregos")]
    Jobs,
    #[sea_orm(string_value = "animais")]
    #[serde(rename = "animais")]
    Pets,
    #[sea_orm(string_value = "eventos")]
    #[serde(rename = "eventos")]
    Events,
}

/// Category-specific listing fields.
///
/// Stored as a JSON column tagged by category, so each category carries
/// its own typed field set instead of an open attribute map. The tag must
/// agree with the listing's `category` column; services validate the pair
/// before persisting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(tag = "category", rename_all_fields = "camelCase")]
pub enum ListingDetails {
    #[serde(rename = "negocios")]
    Business {
        annual_revenue: Option<String>,
        profit_margin: Option<String>,
        employees: Option<i32>,
    },
    #[serde(rename = "imoveis")]
    RealEstate {
        bedrooms: i32,
        bathrooms: i32,
        area_m2: f64,
    },
    #[serde(rename = "veiculos")]
    Vehicles {
        brand: String,
        model: String,
        year: i32,
        mileage_km: Option<i32>,
    },
    #[serde(rename = "eletronicos")]
    Electronics {
        brand: String,
        model: Option<String>,
        condition: String,
    },
    #[serde(rename = "roupas")]
    Apparel {
        brand: Option<String>,
        size: String,
        gender: Option<String>,
    },
    #[serde(rename = "servicos")]
    Services {
        service_type: String,
        experience: Option<String>,
    },
    #[serde(rename = "casa_e_jardim")]
    HomeAndGarden {
        condition: String,
        material: Option<String>,
    },
    #[serde(rename = "empregos")]
    Jobs {
        role: String,
        contract_type: String,
        work_model: String,
    },
    #[serde(rename = "animais")]
    Pets { breed: String, age: String },
    #[serde(rename = "eventos")]
    Events {
        event_name: String,
        event_date: String,
        event_location: String,
    },
}

impl ListingDetails {
    /// The category this detail payload belongs to.
    #[must_use]
    pub const fn category(&self) -> ListingCategory {
        match self {
            Self::Business { .. } => ListingCategory::Business,
            Self::RealEstate { .. } => ListingCategory::RealEstate,
            Self::Vehicles { .. } => ListingCategory::Vehicles,
            Self::Electronics { .. } => ListingCategory::Electronics,
            Self::Apparel { .. } => ListingCategory::Apparel,
            Self::Services { .. } => ListingCategory::Services,
            Self::HomeAndGarden { .. } => ListingCategory::HomeAndGarden,
            Self::Jobs { .. } => ListingCategory::Jobs,
            Self::Pets { .. } => ListingCategory::Pets,
            Self::Events { .. } => ListingCategory::Events,
        }
    }
}

/// Listing model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Price as the user typed it, in localized notation ("150.000,00").
    /// `vitrine_common::parse_currency` recovers the numeric value.
    pub price: String,

    pub category: ListingCategory,

    /// Category-specific fields (tagged by category).
    #[sea_orm(column_type = "JsonBinary")]
    pub details: ListingDetails,

    /// Postal code (CEP) of the listing location
    #[sea_orm(nullable)]
    pub postal_code: Option<String>,

    #[sea_orm(nullable)]
    pub city: Option<String>,

    #[sea_orm(nullable)]
    pub state: Option<String>,

    /// Primary image URL
    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    /// Additional image URLs
    #[sea_orm(column_type = "JsonBinary")]
    pub gallery: Json,

    /// Owner of this listing
    pub owner_id: String,

    /// Current moderation status
    pub status: ListingStatus,

    /// Whether a paid promotion is active (see `featured_until`)
    #[sea_orm(default_value = false)]
    pub is_featured: bool,

    /// End of the paid promotion window. Only meaningful once approved;
    /// set exclusively by the payment-confirmation path.
    #[sea_orm(nullable)]
    pub featured_until: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether the paid promotion is active at `now`.
    ///
    /// An elapsed `featured_until` means not featured, even if the flag
    /// has not been cleared yet.
    #[must_use]
    pub fn is_currently_featured(&self, now: DateTime<Utc>) -> bool {
        self.is_featured
            && self
                .featured_until
                .is_some_and(|until| until.with_timezone(&Utc) > now)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,

    #[sea_orm(has_many = "super::moderation_message::Entity")]
    ModerationMessages,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::moderation_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModerationMessages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_details_tag_round_trip() {
        let details = ListingDetails::Vehicles {
            brand: "Fiat".to_string(),
            model: "Uno".to_string(),
            year: 2012,
            mileage_km: Some(98_000),
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["category"], "veiculos");
        assert_eq!(json["mileageKm"], 98_000);

        let back: ListingDetails = serde_json::from_value(json).unwrap();
        assert_eq!(back, details);
    }

    #[test]
    fn test_details_category_agreement() {
        let details = ListingDetails::RealEstate {
            bedrooms: 3,
            bathrooms: 2,
            area_m2: 120.0,
        };
        assert_eq!(details.category(), ListingCategory::RealEstate);
    }

    fn featured_listing(until: Option<DateTime<Utc>>) -> Model {
        Model {
            id: "l1".to_string(),
            title: "Padaria no centro".to_string(),
            description: "Ponto bem movimentado".to_string(),
            price: "150.000,00".to_string(),
            category: ListingCategory::Business,
            details: ListingDetails::Business {
                annual_revenue: None,
                profit_margin: None,
                employees: Some(4),
            },
            postal_code: None,
            city: None,
            state: None,
            image_url: None,
            gallery: serde_json::json!([]),
            owner_id: "u1".to_string(),
            status: ListingStatus::Approved,
            is_featured: until.is_some(),
            featured_until: until.map(Into::into),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_currently_featured() {
        let now = Utc::now();
        let active = featured_listing(Some(now + Duration::days(3)));
        assert!(active.is_currently_featured(now));
    }

    #[test]
    fn test_elapsed_featuring_is_not_featured() {
        let now = Utc::now();
        let elapsed = featured_listing(Some(now - Duration::hours(1)));
        assert!(!elapsed.is_currently_featured(now));

        let never = featured_listing(None);
        assert!(!never.is_currently_featured(now));
    }
}
