//! API integration tests.
//!
//! These tests verify routing, extraction, and validation against an
//! app state backed by a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use vitrine_api::{middleware::AppState, router as api_router};
use vitrine_common::config::FeaturingConfig;
use vitrine_core::{
    AccountService, CategorySuggestionService, ListingService, MessagingService,
    ModerationService, PromotionService, ReputationService,
};
use vitrine_db::repositories::{
    CategorySuggestionRepository, ConversationRepository, CounterRepository, ListingRepository,
    ModerationRepository, PromotionRepository, ReviewRepository, SavedListingRepository,
    UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a mock database connection.
fn create_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

/// Create test app state with mock database.
fn create_test_state() -> AppState {
    let db = Arc::new(create_mock_db());

    let user_repo = UserRepository::new(Arc::clone(&db));
    let listing_repo = ListingRepository::new(Arc::clone(&db));
    let moderation_repo = ModerationRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));
    let promotion_repo = PromotionRepository::new(Arc::clone(&db));
    let conversation_repo = ConversationRepository::new(Arc::clone(&db));
    let saved_listing_repo = SavedListingRepository::new(Arc::clone(&db));
    let suggestion_repo = CategorySuggestionRepository::new(Arc::clone(&db));
    let counter_repo = CounterRepository::new(Arc::clone(&db));

    AppState {
        account_service: AccountService::new(
            user_repo.clone(),
            saved_listing_repo,
            listing_repo.clone(),
            counter_repo.clone(),
        ),
        listing_service: ListingService::new(
            listing_repo.clone(),
            user_repo.clone(),
            counter_repo.clone(),
        ),
        moderation_service: ModerationService::new(
            moderation_repo,
            listing_repo.clone(),
            user_repo.clone(),
            counter_repo,
        ),
        reputation_service: ReputationService::new(review_repo, user_repo.clone()),
        promotion_service: PromotionService::new(promotion_repo, &FeaturingConfig::default()),
        messaging_service: MessagingService::new(
            conversation_repo,
            listing_repo,
            user_repo.clone(),
        ),
        category_suggestion_service: CategorySuggestionService::new(suggestion_repo, user_repo),
    }
}

/// Create the test router.
fn create_test_router() -> Router {
    let state = create_test_state();
    api_router().with_state(state)
}

#[tokio::test]
async fn test_category_catalog_is_public() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/categories")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_listing_requires_auth() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/listings/create")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_submit_review_requires_auth() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reviews/submit")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"reviewedUserId":"u1","rating":5,"comment":"ok","listingId":"l1"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_payment_webhook_rejects_blank_session() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/payments/webhook")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"sessionId":"  ","listingId":"l1","amountConfirmedCents":1000}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
