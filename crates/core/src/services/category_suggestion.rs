//! Category suggestion service.

use vitrine_common::{AppError, AppResult, IdGenerator};
use vitrine_db::{
    entities::category_suggestion::{self, SuggestionStatus},
    repositories::{CategorySuggestionRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for suggesting a new category.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SuggestCategoryInput {
    #[validate(length(min = 1, max = 128))]
    pub category_name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Category suggestion service for business logic.
#[derive(Clone)]
pub struct CategorySuggestionService {
    suggestion_repo: CategorySuggestionRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl CategorySuggestionService {
    /// Create a new category suggestion service.
    #[must_use]
    pub const fn new(
        suggestion_repo: CategorySuggestionRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            suggestion_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Suggest a new category. Any authenticated user.
    pub async fn suggest(
        &self,
        user_id: &str,
        input: SuggestCategoryInput,
    ) -> AppResult<category_suggestion::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;

        let model = category_suggestion::ActiveModel {
            id: Set(self.id_gen.generate()),
            category_name: Set(input.category_name.trim().to_string()),
            description: Set(input.description.filter(|d| !d.trim().is_empty())),
            user_id: Set(user.id),
            user_name: Set(user.name.unwrap_or(user.username)),
            status: Set(SuggestionStatus::Pending),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.suggestion_repo.create(model).await
    }

    /// Get suggestions awaiting review. Admin only.
    pub async fn get_pending(
        &self,
        admin_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<category_suggestion::Model>> {
        self.require_admin(admin_id).await?;
        self.suggestion_repo.find_pending(limit, offset).await
    }

    /// Approve or reject a suggestion. Admin only; a suggestion is
    /// decided once.
    pub async fn set_status(
        &self,
        admin_id: &str,
        suggestion_id: &str,
        status: SuggestionStatus,
    ) -> AppResult<category_suggestion::Model> {
        self.require_admin(admin_id).await?;

        if status == SuggestionStatus::Pending {
            return Err(AppError::Validation(
                "Cannot set a suggestion back to pending".to_string(),
            ));
        }

        let suggestion = self.suggestion_repo.get_by_id(suggestion_id).await?;
        if suggestion.status != SuggestionStatus::Pending {
            return Err(AppError::Validation(
                "Suggestion already decided".to_string(),
            ));
        }

        self.suggestion_repo.update_status(suggestion, status).await
    }

    async fn require_admin(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;
        if !user.is_admin {
            return Err(AppError::Forbidden(
                "Only admins can review suggestions".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_input_validation() {
        let input = SuggestCategoryInput {
            category_name: "Instrumentos Musicais".to_string(),
            description: None,
        };
        assert!(input.validate().is_ok());

        let input = SuggestCategoryInput {
            category_name: String::new(),
            description: None,
        };
        assert!(input.validate().is_err());
    }
}
