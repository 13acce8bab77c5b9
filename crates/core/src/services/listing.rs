//! Listing service.

use crate::services::event_publisher::{EventPublisherService, ListingSnapshot};
use chrono::Utc;
use vitrine_common::{AppError, AppResult, IdGenerator, parse_currency};
use vitrine_db::{
    entities::listing::{self, ListingCategory, ListingDetails, ListingStatus},
    entities::site_counter::APPROVED_LISTING_COUNT,
    repositories::{CounterRepository, ListingRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a listing.
///
/// There is deliberately no status field here: every new listing enters
/// moderation as `pending`, whatever the caller sends upstream.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    /// Localized price string, e.g. "150.000,00".
    #[validate(length(min = 1, max = 64))]
    pub price: String,

    pub category: ListingCategory,

    pub details: ListingDetails,

    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub image_url: Option<String>,

    #[serde(default)]
    pub gallery: Vec<String>,
}

/// Input for an owner content edit.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub price: Option<String>,

    /// Replacing the details also moves the listing to the matching
    /// category.
    pub details: Option<ListingDetails>,

    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub image_url: Option<String>,
    pub gallery: Option<Vec<String>>,
}

/// Public browse filter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseFilter {
    pub category: Option<ListingCategory>,
    /// Maximum numeric price; listings with unparseable prices are
    /// excluded when this is set.
    pub max_price: Option<f64>,
}

/// Listing service for business logic.
#[derive(Clone)]
pub struct ListingService {
    listing_repo: ListingRepository,
    user_repo: UserRepository,
    counter_repo: CounterRepository,
    event_publisher: Option<EventPublisherService>,
    id_gen: IdGenerator,
}

impl ListingService {
    /// Create a new listing service.
    #[must_use]
    pub const fn new(
        listing_repo: ListingRepository,
        user_repo: UserRepository,
        counter_repo: CounterRepository,
    ) -> Self {
        Self {
            listing_repo,
            user_repo,
            counter_repo,
            event_publisher: None,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the event publisher.
    pub fn set_event_publisher(&mut self, event_publisher: EventPublisherService) {
        self.event_publisher = Some(event_publisher);
    }

    /// Submit a new listing for moderation.
    pub async fn create(&self, owner_id: &str, input: CreateListingInput) -> AppResult<listing::Model> {
        input.validate()?;
        validate_content(&input.price, input.category, &input.details)?;

        // The owner must exist before anything is written.
        self.user_repo.get_by_id(owner_id).await?;

        let now = Utc::now();
        let model = listing::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            price: Set(input.price),
            category: Set(input.category),
            details: Set(input.details),
            postal_code: Set(input.postal_code),
            city: Set(input.city),
            state: Set(input.state),
            image_url: Set(input.image_url),
            gallery: Set(serde_json::json!(input.gallery)),
            owner_id: Set(owner_id.to_string()),
            status: Set(ListingStatus::Pending),
            is_featured: Set(false),
            featured_until: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let listing = self.listing_repo.create(model).await?;

        if let Some(ref publisher) = self.event_publisher
            && let Err(e) = publisher
                .publish_listing_created(&ListingSnapshot::from(&listing))
                .await
        {
            tracing::warn!(error = %e, listing_id = %listing.id, "Failed to publish listing created event");
        }

        Ok(listing)
    }

    /// Get a listing for editing. Owner only.
    pub async fn get_for_edit(&self, caller_id: &str, listing_id: &str) -> AppResult<listing::Model> {
        let listing = self.listing_repo.get_by_id(listing_id).await?;
        if listing.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the owner can edit a listing".to_string(),
            ));
        }
        Ok(listing)
    }

    /// Get a publicly visible listing.
    pub async fn get_public(&self, listing_id: &str) -> AppResult<listing::Model> {
        self.listing_repo
            .find_approved_by_id(listing_id)
            .await?
            .ok_or_else(|| AppError::ListingNotFound(listing_id.to_string()))
    }

    /// Browse approved listings.
    pub async fn browse(
        &self,
        filter: BrowseFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<listing::Model>> {
        let listings = self
            .listing_repo
            .find_approved(filter.category, limit, offset)
            .await?;
        Ok(apply_price_filter(listings, filter.max_price))
    }

    /// Get all listings created by a user, any status. Owner only.
    pub async fn get_user_created_listings(&self, owner_id: &str) -> AppResult<Vec<listing::Model>> {
        self.listing_repo.find_by_owner(owner_id).await
    }

    /// Apply an owner content edit.
    ///
    /// Status, featuring, and ownership are not reachable from here;
    /// they belong to moderation and the payment callback.
    pub async fn update(
        &self,
        caller_id: &str,
        listing_id: &str,
        input: UpdateListingInput,
    ) -> AppResult<listing::Model> {
        input.validate()?;

        let listing = self.get_for_edit(caller_id, listing_id).await?;

        if let Some(ref price) = input.price
            && parse_currency(price).is_none()
        {
            return Err(AppError::Validation(format!("Unparseable price: {price}")));
        }

        let category = input.details.as_ref().map(ListingDetails::category);

        let mut active: listing::ActiveModel = listing.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(details) = input.details {
            active.details = Set(details);
        }
        if let Some(category) = category {
            active.category = Set(category);
        }
        if let Some(postal_code) = input.postal_code {
            active.postal_code = Set(Some(postal_code));
        }
        if let Some(city) = input.city {
            active.city = Set(Some(city));
        }
        if let Some(state) = input.state {
            active.state = Set(Some(state));
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(gallery) = input.gallery {
            active.gallery = Set(serde_json::json!(gallery));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.listing_repo.update(active).await?;

        if let Some(ref publisher) = self.event_publisher
            && let Err(e) = publisher
                .publish_listing_updated(&ListingSnapshot::from(&updated))
                .await
        {
            tracing::warn!(error = %e, listing_id = %updated.id, "Failed to publish listing updated event");
        }

        Ok(updated)
    }

    /// Hard-delete a listing. Owner or admin.
    pub async fn delete(&self, caller_id: &str, listing_id: &str) -> AppResult<()> {
        let caller = self.user_repo.get_by_id(caller_id).await?;
        let listing = self.listing_repo.get_by_id(listing_id).await?;

        if listing.owner_id != caller.id && !caller.is_admin {
            return Err(AppError::Forbidden(
                "Only the owner or an admin can delete a listing".to_string(),
            ));
        }

        let was_approved = listing.status == ListingStatus::Approved;
        let id = listing.id.clone();
        self.listing_repo.delete(listing).await?;

        // Deleting an approved listing takes it out of the public pool.
        if was_approved {
            self.counter_repo.decrement(APPROVED_LISTING_COUNT).await?;
        }

        if let Some(ref publisher) = self.event_publisher
            && let Err(e) = publisher.publish_listing_deleted(&id).await
        {
            tracing::warn!(error = %e, listing_id = %id, "Failed to publish listing deleted event");
        }

        Ok(())
    }
}

fn validate_content(
    price: &str,
    category: ListingCategory,
    details: &ListingDetails,
) -> AppResult<()> {
    if parse_currency(price).is_none() {
        return Err(AppError::Validation(format!("Unparseable price: {price}")));
    }
    if details.category() != category {
        return Err(AppError::Validation(
            "Details do not match the listing category".to_string(),
        ));
    }
    Ok(())
}

fn apply_price_filter(listings: Vec<listing::Model>, max_price: Option<f64>) -> Vec<listing::Model> {
    match max_price {
        Some(max) => listings
            .into_iter()
            .filter(|l| parse_currency(&l.price).is_some_and(|p| p <= max))
            .collect(),
        None => listings,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn vehicle_details() -> ListingDetails {
        ListingDetails::Vehicles {
            brand: "Volkswagen".to_string(),
            model: "Gol".to_string(),
            year: 2015,
            mileage_km: Some(60_000),
        }
    }

    fn test_listing(id: &str, price: &str) -> listing::Model {
        listing::Model {
            id: id.to_string(),
            title: "Gol 1.0".to_string(),
            description: "Único dono".to_string(),
            price: price.to_string(),
            category: ListingCategory::Vehicles,
            details: vehicle_details(),
            postal_code: None,
            city: None,
            state: None,
            image_url: None,
            gallery: serde_json::json!([]),
            owner_id: "u1".to_string(),
            status: ListingStatus::Approved,
            is_featured: false,
            featured_until: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_validate_content_rejects_category_mismatch() {
        let result = validate_content("10.000,00", ListingCategory::RealEstate, &vehicle_details());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_content_rejects_unparseable_price() {
        let result = validate_content("a combinar", ListingCategory::Vehicles, &vehicle_details());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_content_accepts_matching_pair() {
        assert!(validate_content("35.000,00", ListingCategory::Vehicles, &vehicle_details()).is_ok());
    }

    #[test]
    fn test_price_filter_keeps_cheap_listings() {
        let listings = vec![
            test_listing("l1", "20.000,00"),
            test_listing("l2", "80.000,00"),
        ];

        let filtered = apply_price_filter(listings, Some(50_000.0));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "l1");
    }

    #[test]
    fn test_price_filter_drops_unparseable_prices() {
        let listings = vec![test_listing("l1", "consultar")];
        let filtered = apply_price_filter(listings, Some(1_000_000.0));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_price_filter_without_max_keeps_everything() {
        let listings = vec![test_listing("l1", "consultar")];
        let filtered = apply_price_filter(listings, None);
        assert_eq!(filtered.len(), 1);
    }
}
