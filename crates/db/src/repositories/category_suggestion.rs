//! Category suggestion repository.

use std::sync::Arc;

use crate::entities::category_suggestion::SuggestionStatus;
use crate::entities::{CategorySuggestion, category_suggestion};
use vitrine_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

/// Category suggestion repository for database operations.
#[derive(Clone)]
pub struct CategorySuggestionRepository {
    db: Arc<DatabaseConnection>,
}

impl CategorySuggestionRepository {
    /// Create a new category suggestion repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a suggestion by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<category_suggestion::Model> {
        CategorySuggestion::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Category suggestion: {id}")))
    }

    /// Create a new suggestion.
    pub async fn create(
        &self,
        model: category_suggestion::ActiveModel,
    ) -> AppResult<category_suggestion::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get pending suggestions, oldest first.
    pub async fn find_pending(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<category_suggestion::Model>> {
        CategorySuggestion::find()
            .filter(category_suggestion::Column::Status.eq(SuggestionStatus::Pending))
            .order_by_asc(category_suggestion::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a suggestion's status.
    pub async fn update_status(
        &self,
        suggestion: category_suggestion::Model,
        status: SuggestionStatus,
    ) -> AppResult<category_suggestion::Model> {
        let mut active: category_suggestion::ActiveModel = suggestion.into();
        active.status = Set(status);
        active
            .update(self.db.as_ref())
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
    async fn test_find_pending() {
        let suggestion = category_suggestion::Model {
            id: "s1".to_string(),
            category_name: "Instrumentos Musicais".to_string(),
            description: Some("Violões, baterias, teclados".to_string()),
            user_id: "u1".to_string(),
            user_name: "Maria".to_string(),
            status: SuggestionStatus::Pending,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[suggestion]])
                .into_connection(),
        );

        let repo = CategorySuggestionRepository::new(db);
        let result = repo.find_pending(50, 0).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category_name, "Instrumentos Musicais");
    }
}
