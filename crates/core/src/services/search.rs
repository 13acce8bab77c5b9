//! Search index mirror with optional Meilisearch integration.
//!
//! The core publishes listing domain events; this service is the
//! subscriber that mirrors them into a search index. Only approved
//! listings are mirrored, so the index can never leak a listing the
//! public query predicate would hide.
//!
//! Without the `meilisearch` cargo feature (or without a configured
//! URL) every operation is a traced no-op, which keeps the event wiring
//! identical in all environments.

use async_trait::async_trait;
use vitrine_common::AppResult;
use vitrine_common::config::SearchConfig;
use serde::{Deserialize, Serialize};

#[cfg(feature = "meilisearch")]
use vitrine_common::AppError;
#[cfg(feature = "meilisearch")]
use meilisearch_sdk::client::Client as MeilisearchClient;

use crate::services::event_publisher::{EventPublisher, ListingSnapshot};

/// Name of the listings index.
const LISTINGS_INDEX: &str = "listings";

/// Document representing a listing in the search index.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDocument {
    /// Listing ID (primary key)
    pub id: String,
    pub title: String,
    pub description: String,
    /// Localized price string as stored
    pub price: String,
    pub category: String,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Featured listings rank first
    pub is_featured: bool,
    /// Creation timestamp (Unix epoch seconds)
    pub created_at: i64,
}

impl From<&ListingSnapshot> for ListingDocument {
    fn from(snapshot: &ListingSnapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            title: snapshot.title.clone(),
            description: snapshot.description.clone(),
            price: snapshot.price.clone(),
            category: snapshot.category.clone(),
            city: snapshot.city.clone(),
            state: snapshot.state.clone(),
            is_featured: snapshot.is_featured,
            created_at: snapshot.created_at,
        }
    }
}

/// Search service mirroring approved listings into Meilisearch.
#[derive(Clone)]
pub struct SearchService {
    #[cfg(feature = "meilisearch")]
    client: Option<MeilisearchClient>,
    #[cfg(not(feature = "meilisearch"))]
    _config: (),
}

impl SearchService {
    /// Create a new search service from configuration.
    #[must_use]
    pub fn new(config: &SearchConfig) -> Self {
        #[cfg(feature = "meilisearch")]
        {
            let client = config.meilisearch_url.as_ref().and_then(|url| {
                match MeilisearchClient::new(url, config.meilisearch_api_key.as_deref()) {
                    Ok(client) => Some(client),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to create Meilisearch client, search mirroring disabled");
                        None
                    }
                }
            });
            if client.is_some() {
                tracing::info!("Meilisearch mirroring enabled");
            }
            Self { client }
        }
        #[cfg(not(feature = "meilisearch"))]
        {
            let _ = config;
            Self { _config: () }
        }
    }

    /// Whether a search backend is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        #[cfg(feature = "meilisearch")]
        {
            self.client.is_some()
        }
        #[cfg(not(feature = "meilisearch"))]
        {
            false
        }
    }

    /// Add or replace a listing document in the index.
    pub async fn index_listing(&self, document: &ListingDocument) -> AppResult<()> {
        #[cfg(feature = "meilisearch")]
        if let Some(ref client) = self.client {
            client
                .index(LISTINGS_INDEX)
                .add_or_replace(std::slice::from_ref(document), Some("id"))
                .await
                .map_err(|e| AppError::ExternalService(e.to_string()))?;
            return Ok(());
        }

        tracing::debug!(listing_id = %document.id, "Search mirroring disabled, skipping index");
        Ok(())
    }

    /// Remove a listing document from the index.
    pub async fn remove_listing(&self, listing_id: &str) -> AppResult<()> {
        #[cfg(feature = "meilisearch")]
        if let Some(ref client) = self.client {
            client
                .index(LISTINGS_INDEX)
                .delete_document(listing_id)
                .await
                .map_err(|e| AppError::ExternalService(e.to_string()))?;
            return Ok(());
        }

        tracing::debug!(listing_id, "Search mirroring disabled, skipping delete");
        Ok(())
    }

    async fn mirror(&self, listing: &ListingSnapshot) -> AppResult<()> {
        // The index only ever holds publicly visible listings.
        if listing.status == "approved" {
            self.index_listing(&ListingDocument::from(listing)).await
        } else {
            self.remove_listing(&listing.id).await
        }
    }
}

#[async_trait]
impl EventPublisher for SearchService {
    async fn publish_listing_created(&self, listing: &ListingSnapshot) -> AppResult<()> {
        self.mirror(listing).await
    }

    async fn publish_listing_updated(&self, listing: &ListingSnapshot) -> AppResult<()> {
        self.mirror(listing).await
    }

    async fn publish_listing_deleted(&self, listing_id: &str) -> AppResult<()> {
        self.remove_listing(listing_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(status: &str) -> ListingSnapshot {
        ListingSnapshot {
            id: "l1".to_string(),
            title: "Padaria no centro".to_string(),
            description: "Ponto movimentado".to_string(),
            price: "150.000,00".to_string(),
            category: "negocios".to_string(),
            city: Some("Lisboa".to_string()),
            state: None,
            status: status.to_string(),
            is_featured: false,
            created_at: 1_750_000_000,
        }
    }

    #[test]
    fn test_document_from_snapshot() {
        let doc = ListingDocument::from(&snapshot("approved"));
        assert_eq!(doc.id, "l1");
        assert_eq!(doc.category, "negocios");
    }

    #[tokio::test]
    async fn test_disabled_service_is_noop() {
        let service = SearchService::new(&SearchConfig::default());
        assert!(!service.is_enabled());

        // Both paths succeed without a backend.
        assert!(service.mirror(&snapshot("approved")).await.is_ok());
        assert!(service.mirror(&snapshot("pending")).await.is_ok());
    }
}
