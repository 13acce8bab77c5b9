//! Listing repository.

use std::sync::Arc;

use crate::entities::{Listing, listing};
use crate::entities::listing::{ListingCategory, ListingStatus};
use vitrine_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Listing repository for database operations.
#[derive(Clone)]
pub struct ListingRepository {
    db: Arc<DatabaseConnection>,
}

impl ListingRepository {
    /// Create a new listing repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a listing by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<listing::Model>> {
        Listing::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a listing by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<listing::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ListingNotFound(id.to_string()))
    }

    /// Create a new listing.
    pub async fn create(&self, model: listing::ActiveModel) -> AppResult<listing::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a listing.
    pub async fn update(&self, model: listing::ActiveModel) -> AppResult<listing::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete a listing.
    ///
    /// Moderation messages cascade at the schema level. Conversations
    /// keep their listing id and resolve it lazily at read time.
    pub async fn delete(&self, model: listing::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Mark a listing approved if it is not already.
    ///
    /// Returns `true` when a genuine transition happened. An already
    /// approved listing only gets its timestamp refreshed, making the
    /// operation idempotent without a read-modify-write race.
    pub async fn approve(&self, id: &str) -> AppResult<bool> {
        let now = chrono::Utc::now();

        let result = Listing::update_many()
            .col_expr(listing::Column::Status, Expr::value(ListingStatus::Approved))
            .col_expr(listing::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(listing::Column::Id.eq(id))
            .filter(listing::Column::Status.ne(ListingStatus::Approved))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected > 0 {
            return Ok(true);
        }

        // Already approved (or missing): refresh the timestamp only.
        Listing::update_many()
            .col_expr(listing::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(listing::Column::Id.eq(id))
            .filter(listing::Column::Status.eq(ListingStatus::Approved))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(false)
    }

    /// Get listings awaiting moderation, oldest first.
    pub async fn find_pending(&self, limit: u64, offset: u64) -> AppResult<Vec<listing::Model>> {
        Listing::find()
            .filter(listing::Column::Status.eq(ListingStatus::Pending))
            .order_by_asc(listing::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get publicly visible listings.
    ///
    /// This is the single place where status-driven visibility is
    /// expressed: only `approved` listings are ever publicly queryable.
    /// Featured listings sort first, then newest.
    pub async fn find_approved(
        &self,
        category: Option<ListingCategory>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<listing::Model>> {
        let mut query = Listing::find().filter(listing::Column::Status.eq(ListingStatus::Approved));

        if let Some(category) = category {
            query = query.filter(listing::Column::Category.eq(category));
        }

        query
            .order_by_desc(listing::Column::IsFeatured)
            .order_by_desc(listing::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a publicly visible listing by ID.
    pub async fn find_approved_by_id(&self, id: &str) -> AppResult<Option<listing::Model>> {
        Listing::find_by_id(id)
            .filter(listing::Column::Status.eq(ListingStatus::Approved))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all listings created by a user, newest first.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<listing::Model>> {
        Listing::find()
            .filter(listing::Column::OwnerId.eq(owner_id))
            .order_by_desc(listing::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::listing::ListingDetails;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_listing(id: &str, status: ListingStatus) -> listing::Model {
        listing::Model {
            id: id.to_string(),
            title: "Apartamento 2 quartos".to_string(),
            description: "Perto do metrô".to_string(),
            price: "350.000,00".to_string(),
            category: ListingCategory::RealEstate,
            details: ListingDetails::RealEstate {
                bedrooms: 2,
                bathrooms: 1,
                area_m2: 60.0,
            },
            postal_code: None,
            city: Some("São Paulo".to_string()),
            state: Some("SP".to_string()),
            image_url: None,
            gallery: serde_json::json!([]),
            owner_id: "u1".to_string(),
            status,
            is_featured: false,
            featured_until: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<listing::Model>::new()])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::ListingNotFound(_))));
    }

    #[tokio::test]
    async fn test_approve_transitions_pending_listing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        let transitioned = repo.approve("l1").await.unwrap();

        assert!(transitioned);
    }

    #[tokio::test]
    async fn test_approve_is_idempotent() {
        // First UPDATE matches nothing (already approved), the second
        // refreshes the timestamp.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        let transitioned = repo.approve("l1").await.unwrap();

        assert!(!transitioned);
    }

    #[tokio::test]
    async fn test_find_pending() {
        let l1 = create_test_listing("l1", ListingStatus::Pending);
        let l2 = create_test_listing("l2", ListingStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[l1, l2]])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        let result = repo.find_pending(50, 0).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_owner() {
        let l1 = create_test_listing("l1", ListingStatus::Approved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[l1]])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        let result = repo.find_by_owner("u1").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].owner_id, "u1");
    }
}
