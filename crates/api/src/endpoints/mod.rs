//! API endpoints.

mod admin;
mod auth;
mod categories;
mod listings;
mod messaging;
mod payments;
mod reviews;
mod users;

use axum::Router;

use crate::middleware::AppState;

pub use listings::ListingResponse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/listings", listings::router())
        .nest("/admin", admin::router())
        .nest("/reviews", reviews::router())
        .nest("/users", users::router())
        .nest("/messaging", messaging::router())
        .nest("/payments", payments::router())
        .nest("/categories", categories::router())
}
