//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod category_suggestion;
pub mod event_publisher;
pub mod listing;
pub mod messaging;
pub mod moderation;
pub mod promotion;
pub mod reputation;
pub mod search;

pub use account::{AccountService, RegisterInput, SaveProfileInput};
pub use category_suggestion::{CategorySuggestionService, SuggestCategoryInput};
pub use event_publisher::{EventPublisher, EventPublisherService, ListingSnapshot, NoOpEventPublisher};
pub use listing::{BrowseFilter, CreateListingInput, ListingService, UpdateListingInput};
pub use messaging::{ConversationSummary, ListingRef, MessagingService};
pub use moderation::ModerationService;
pub use promotion::{PaymentConfirmation, PromotionService};
pub use reputation::{ReputationService, SubmitReviewInput, UserProfileView};
pub use search::{ListingDocument, SearchService};
