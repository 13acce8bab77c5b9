//! Common utilities and shared types for vitrine.
//!
//! This crate provides foundational components used across all vitrine crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Currency**: Parsing and formatting of localized price strings
//!
//! # Example
//!
//! ```no_run
//! use vitrine_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod currency;
pub mod error;
pub mod id;

pub use config::Config;
pub use currency::{format_currency, parse_currency};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
