//! HTTP API layer for vitrine.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: listings, moderation, reviews, messaging, accounts,
//!   payment webhook
//! - **Extractors**: Authentication
//! - **Middleware**: Token auth, rate limiting
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod rate_limit;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
pub use rate_limit::{ApiRateLimiter, RateLimitConfig, RateLimiterState};
