//! Account service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use vitrine_common::{AppError, AppResult, IdGenerator};
use vitrine_db::{
    entities::{saved_listing, user},
    entities::site_counter::USER_COUNT,
    repositories::{CounterRepository, ListingRepository, SavedListingRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for registering a new account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 256))]
    pub name: Option<String>,
}

/// Input for saving profile data.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileInput {
    #[validate(length(max = 256))]
    pub name: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 16))]
    pub postal_code: Option<String>,

    pub street: Option<String>,
    pub street_number: Option<String>,
    pub complement: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    saved_listing_repo: SavedListingRepository,
    listing_repo: ListingRepository,
    counter_repo: CounterRepository,
    id_gen: IdGenerator,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        saved_listing_repo: SavedListingRepository,
        listing_repo: ListingRepository,
        counter_repo: CounterRepository,
    ) -> Self {
        Self {
            user_repo,
            saved_listing_repo,
            listing_repo,
            counter_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        input.validate()?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("Username already taken".to_string()));
        }
        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let token = self.id_gen.generate_token();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            email: Set(input.email),
            password_hash: Set(password_hash),
            token: Set(Some(token)),
            name: Set(input.name),
            phone: Set(None),
            phone_verified: Set(false),
            postal_code: Set(None),
            street: Set(None),
            street_number: Set(None),
            complement: Set(None),
            city: Set(None),
            state: Set(None),
            is_admin: Set(false),
            review_count: Set(0),
            average_rating: Set(0.0),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;

        // Commutative, so a plain atomic increment is enough.
        self.counter_repo.increment(USER_COUNT).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Log in with username and password, returning the user (with its
    /// bearer token) on success.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Authenticate a request by bearer token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Save profile fields. Never touches role or reputation aggregates.
    pub async fn save_profile(
        &self,
        user_id: &str,
        input: SaveProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        if let Some(name) = input.name {
            active.name = Set(Some(name));
        }
        if let Some(phone) = input.phone {
            // A new number needs verification again.
            active.phone = Set(Some(phone));
            active.phone_verified = Set(false);
        }
        if let Some(postal_code) = input.postal_code {
            active.postal_code = Set(Some(postal_code));
        }
        if let Some(street) = input.street {
            active.street = Set(Some(street));
        }
        if let Some(street_number) = input.street_number {
            active.street_number = Set(Some(street_number));
        }
        if let Some(complement) = input.complement {
            active.complement = Set(Some(complement));
        }
        if let Some(city) = input.city {
            active.city = Set(Some(city));
        }
        if let Some(state) = input.state {
            active.state = Set(Some(state));
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Bookmark a listing, snapshotting its title.
    pub async fn save_listing(&self, user_id: &str, listing_id: &str) -> AppResult<()> {
        let listing = self.listing_repo.get_by_id(listing_id).await?;
        self.saved_listing_repo
            .save(user_id, listing_id, &listing.title)
            .await
    }

    /// Remove a bookmark.
    pub async fn remove_saved_listing(&self, user_id: &str, listing_id: &str) -> AppResult<()> {
        self.saved_listing_repo.remove(user_id, listing_id).await
    }

    /// Whether the user bookmarked a listing.
    pub async fn is_listing_saved(&self, user_id: &str, listing_id: &str) -> AppResult<bool> {
        self.saved_listing_repo.is_saved(user_id, listing_id).await
    }

    /// Get the user's bookmarks, most recent first.
    pub async fn get_saved_listings(&self, user_id: &str) -> AppResult<Vec<saved_listing::Model>> {
        self.saved_listing_repo.find_by_user(user_id).await
    }
}

/// Hash a password with Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_input_validation() {
        let input = RegisterInput {
            username: "maria".to_string(),
            email: "maria@example.com".to_string(),
            password: "password123".to_string(),
            name: Some("Maria".to_string()),
        };
        assert!(input.validate().is_ok());

        let input = RegisterInput {
            username: "maria".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            name: None,
        };
        assert!(input.validate().is_err());

        let input = RegisterInput {
            username: "maria".to_string(),
            email: "maria@example.com".to_string(),
            password: "short".to_string(),
            name: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }
}
