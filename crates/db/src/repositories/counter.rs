//! Site counter repository.
//!
//! Counters are commutative, so a single-statement atomic increment is
//! both sufficient and required here; anything needing the previous
//! value (like the rating average) goes through a serializable
//! transaction instead.

use std::sync::Arc;

use crate::entities::{SiteCounter, site_counter};
use vitrine_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::Expr,
};

/// Counter repository for database operations.
#[derive(Clone)]
pub struct CounterRepository {
    db: Arc<DatabaseConnection>,
}

impl CounterRepository {
    /// Create a new counter repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Increment a counter atomically (single UPDATE query, no fetch).
    pub async fn increment(&self, name: &str) -> AppResult<()> {
        SiteCounter::update_many()
            .col_expr(
                site_counter::Column::Value,
                Expr::col(site_counter::Column::Value).add(1),
            )
            .filter(site_counter::Column::Name.eq(name))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement a counter atomically, never below zero.
    pub async fn decrement(&self, name: &str) -> AppResult<()> {
        SiteCounter::update_many()
            .col_expr(
                site_counter::Column::Value,
                Expr::cust("GREATEST(value - 1, 0)"),
            )
            .filter(site_counter::Column::Name.eq(name))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Read a counter value for display.
    pub async fn get(&self, name: &str) -> AppResult<i64> {
        let counter = SiteCounter::find_by_id(name)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(counter.map_or(0, |c| c.value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::site_counter::USER_COUNT;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_increment_issues_single_update() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = CounterRepository::new(db);
        assert!(repo.increment(USER_COUNT).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_missing_counter_is_zero() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<site_counter::Model>::new()])
                .into_connection(),
        );

        let repo = CounterRepository::new(db);
        assert_eq!(repo.get("nonexistent").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_existing_counter() {
        let counter = site_counter::Model {
            name: USER_COUNT.to_string(),
            value: 42,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[counter]])
                .into_connection(),
        );

        let repo = CounterRepository::new(db);
        assert_eq!(repo.get(USER_COUNT).await.unwrap(), 42);
    }
}
