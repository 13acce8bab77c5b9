//! Saved listing repository.

use std::sync::Arc;

use crate::entities::{SavedListing, saved_listing};
use vitrine_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

/// Saved listing repository for database operations.
#[derive(Clone)]
pub struct SavedListingRepository {
    db: Arc<DatabaseConnection>,
}

impl SavedListingRepository {
    /// Create a new saved listing repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Bookmark a listing for a user. Saving twice is a no-op.
    pub async fn save(&self, user_id: &str, listing_id: &str, title: &str) -> AppResult<()> {
        let model = saved_listing::ActiveModel {
            user_id: Set(user_id.to_string()),
            listing_id: Set(listing_id.to_string()),
            title: Set(title.to_string()),
            saved_at: Set(chrono::Utc::now().into()),
        };

        SavedListing::insert(model)
            .on_conflict(
                OnConflict::columns([
                    saved_listing::Column::UserId,
                    saved_listing::Column::ListingId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .do_nothing()
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Remove a bookmark. Removing a missing bookmark is a no-op.
    pub async fn remove(&self, user_id: &str, listing_id: &str) -> AppResult<()> {
        SavedListing::delete_many()
            .filter(saved_listing::Column::UserId.eq(user_id))
            .filter(saved_listing::Column::ListingId.eq(listing_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Whether a user has bookmarked a listing.
    pub async fn is_saved(&self, user_id: &str, listing_id: &str) -> AppResult<bool> {
        let found = SavedListing::find_by_id((user_id.to_string(), listing_id.to_string()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(found.is_some())
    }

    /// Get a user's bookmarks, most recently saved first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<saved_listing::Model>> {
        SavedListing::find()
            .filter(saved_listing::Column::UserId.eq(user_id))
            .order_by_desc(saved_listing::Column::SavedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_is_saved_true() {
        let saved = saved_listing::Model {
            user_id: "u1".to_string(),
            listing_id: "l1".to_string(),
            title: "Padaria no centro".to_string(),
            saved_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[saved]])
                .into_connection(),
        );

        let repo = SavedListingRepository::new(db);
        assert!(repo.is_saved("u1", "l1").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_saved_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<saved_listing::Model>::new()])
                .into_connection(),
        );

        let repo = SavedListingRepository::new(db);
        assert!(!repo.is_saved("u1", "l2").await.unwrap());
    }
}
