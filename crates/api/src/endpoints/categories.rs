//! Category catalog and suggestion endpoints.

use axum::{Json, Router, extract::State, routing::{get, post}};
use vitrine_common::AppResult;
use vitrine_core::SuggestCategoryInput;
use vitrine_db::entities::listing::ListingCategory;
use sea_orm::{ActiveEnum, Iterable};
use serde::Serialize;

use crate::endpoints::admin::SuggestionResponse;
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// One catalog entry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    /// Stable id used in listings and queries.
    pub id: String,
    /// Display name.
    pub name: String,
}

const fn display_name(category: ListingCategory) -> &'static str {
    match category {
        ListingCategory::Business => "Negócios e Investimentos",
        ListingCategory::RealEstate => "Imóveis",
        ListingCategory::Vehicles => "Veículos",
        ListingCategory::Electronics => "Eletrônicos",
        ListingCategory::Apparel => "Roupas e Acessórios",
        ListingCategory::Services => "Serviços",
        ListingCategory::HomeAndGarden => "Para Casa e Jardim",
        ListingCategory::Jobs => "Vagas de Emprego",
        ListingCategory::Pets => "Animais de Estimação",
        ListingCategory::Events => "Ingressos e Eventos",
    }
}

/// Get the category catalog.
async fn catalog() -> ApiResponse<Vec<CategoryResponse>> {
    let categories = ListingCategory::iter()
        .map(|category| CategoryResponse {
            id: category.to_value(),
            name: display_name(category).to_string(),
        })
        .collect();
    ApiResponse::ok(categories)
}

/// Suggest a new category.
async fn suggest(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SuggestCategoryInput>,
) -> AppResult<ApiResponse<SuggestionResponse>> {
    let suggestion = state
        .category_suggestion_service
        .suggest(&user.id, req)
        .await?;
    Ok(ApiResponse::ok(suggestion.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog))
        .route("/suggest", post(suggest))
}
