//! Database entities.

#![allow(missing_docs)]

pub mod category_suggestion;
pub mod conversation;
pub mod featured_payment;
pub mod listing;
pub mod message;
pub mod moderation_message;
pub mod review;
pub mod saved_listing;
pub mod site_counter;
pub mod user;

pub use category_suggestion::Entity as CategorySuggestion;
pub use conversation::Entity as Conversation;
pub use featured_payment::Entity as FeaturedPayment;
pub use listing::Entity as Listing;
pub use message::Entity as Message;
pub use moderation_message::Entity as ModerationMessage;
pub use review::Entity as Review;
pub use saved_listing::Entity as SavedListing;
pub use site_counter::Entity as SiteCounter;
pub use user::Entity as User;
