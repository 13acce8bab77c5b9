//! Event publisher service.
//!
//! Listing create/update/delete are exposed as domain events so
//! collaborators (the search index mirror, most notably) can subscribe
//! without the core depending on them.

use async_trait::async_trait;
use sea_orm::ActiveEnum;
use vitrine_common::AppResult;
use vitrine_db::entities::listing;
use std::sync::Arc;

/// The subset of a listing that subscribers receive.
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: String,
    pub is_featured: bool,
    pub created_at: i64,
}

impl From<&listing::Model> for ListingSnapshot {
    fn from(model: &listing::Model) -> Self {
        Self {
            id: model.id.clone(),
            title: model.title.clone(),
            description: model.description.clone(),
            price: model.price.clone(),
            category: model.category.to_value(),
            city: model.city.clone(),
            state: model.state.clone(),
            status: model.status.to_value(),
            is_featured: model.is_featured,
            created_at: model.created_at.timestamp(),
        }
    }
}

/// Trait for publishing listing domain events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a listing created event.
    async fn publish_listing_created(&self, listing: &ListingSnapshot) -> AppResult<()>;

    /// Publish a listing updated event.
    ///
    /// Also fired for moderation and featuring changes, since they alter
    /// what subscribers should mirror.
    async fn publish_listing_updated(&self, listing: &ListingSnapshot) -> AppResult<()>;

    /// Publish a listing deleted event.
    async fn publish_listing_deleted(&self, listing_id: &str) -> AppResult<()>;
}

/// A no-op implementation of `EventPublisher` for testing or when no
/// subscriber is configured.
#[derive(Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish_listing_created(&self, _listing: &ListingSnapshot) -> AppResult<()> {
        Ok(())
    }

    async fn publish_listing_updated(&self, _listing: &ListingSnapshot) -> AppResult<()> {
        Ok(())
    }

    async fn publish_listing_deleted(&self, _listing_id: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed `EventPublisher` trait object.
pub type EventPublisherService = Arc<dyn EventPublisher>;
