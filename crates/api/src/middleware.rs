//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use vitrine_core::{
    AccountService, CategorySuggestionService, ListingService, MessagingService,
    ModerationService, PromotionService, ReputationService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub listing_service: ListingService,
    pub moderation_service: ModerationService,
    pub reputation_service: ReputationService,
    pub promotion_service: PromotionService,
    pub messaging_service: MessagingService,
    pub category_suggestion_service: CategorySuggestionService,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token to a user and stores it in request
/// extensions; endpoints opt in through the `AuthUser` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        // Authenticate user by token
        if let Ok(user) = state.account_service.authenticate_by_token(token).await {
            req.extensions_mut().insert(user);
        }
    }

    next.run(req).await
}
