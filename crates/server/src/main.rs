//! Vitrine server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use vitrine_api::{
    AppState, RateLimiterState,
    middleware::auth_middleware,
    rate_limit::rate_limit_middleware,
    router as api_router,
};
use vitrine_common::Config;
use vitrine_core::{
    AccountService, CategorySuggestionService, EventPublisherService, ListingService,
    MessagingService, ModerationService, PromotionService, ReputationService, SearchService,
};
use vitrine_db::repositories::{
    CategorySuggestionRepository, ConversationRepository, CounterRepository, ListingRepository,
    ModerationRepository, PromotionRepository, ReviewRepository, SavedListingRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitrine=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting vitrine server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = Arc::new(vitrine_db::init(&config).await?);
    info!("Connected to database");

    info!("Running database migrations...");
    vitrine_db::migrate(&db).await?;
    info!("Migrations completed");

    // Repositories
    let user_repo = UserRepository::new(db.clone());
    let listing_repo = ListingRepository::new(db.clone());
    let moderation_repo = ModerationRepository::new(db.clone());
    let review_repo = ReviewRepository::new(db.clone());
    let promotion_repo = PromotionRepository::new(db.clone());
    let conversation_repo = ConversationRepository::new(db.clone());
    let saved_listing_repo = SavedListingRepository::new(db.clone());
    let suggestion_repo = CategorySuggestionRepository::new(db.clone());
    let counter_repo = CounterRepository::new(db.clone());

    // The search mirror subscribes to listing domain events.
    let search_service = SearchService::new(&config.search);
    if search_service.is_enabled() {
        info!("Search index mirroring enabled");
    }
    let event_publisher: EventPublisherService = Arc::new(search_service);

    // Services
    let mut listing_service = ListingService::new(
        listing_repo.clone(),
        user_repo.clone(),
        counter_repo.clone(),
    );
    listing_service.set_event_publisher(event_publisher.clone());

    let mut moderation_service = ModerationService::new(
        moderation_repo,
        listing_repo.clone(),
        user_repo.clone(),
        counter_repo.clone(),
    );
    moderation_service.set_event_publisher(event_publisher);

    let state = AppState {
        account_service: AccountService::new(
            user_repo.clone(),
            saved_listing_repo,
            listing_repo.clone(),
            counter_repo,
        ),
        listing_service,
        moderation_service,
        reputation_service: ReputationService::new(review_repo, user_repo.clone()),
        promotion_service: PromotionService::new(promotion_repo, &config.featuring),
        messaging_service: MessagingService::new(conversation_repo, listing_repo, user_repo.clone()),
        category_suggestion_service: CategorySuggestionService::new(suggestion_repo, user_repo),
    };

    let rate_limiter = RateLimiterState::new();

    let app = api_router()
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
