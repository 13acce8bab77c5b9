//! Database repositories.

#![allow(missing_docs)]

pub mod category_suggestion;
pub mod conversation;
pub mod counter;
pub mod listing;
pub mod moderation;
pub mod promotion;
pub mod review;
pub mod saved_listing;
pub mod user;

pub use category_suggestion::CategorySuggestionRepository;
pub use conversation::ConversationRepository;
pub use counter::CounterRepository;
pub use listing::ListingRepository;
pub use moderation::ModerationRepository;
pub use promotion::{PaymentOutcome, PromotionRepository};
pub use review::{ReviewInsert, ReviewRepository, fold_rating};
pub use saved_listing::SavedListingRepository;
pub use user::UserRepository;
