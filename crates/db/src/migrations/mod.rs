//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_listing_table;
mod m20250601_000003_create_moderation_message_table;
mod m20250601_000004_create_review_table;
mod m20250601_000005_create_category_suggestion_table;
mod m20250601_000006_create_conversation_tables;
mod m20250601_000007_create_saved_listing_table;
mod m20250601_000008_create_featured_payment_table;
mod m20250601_000009_create_site_counter_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_listing_table::Migration),
            Box::new(m20250601_000003_create_moderation_message_table::Migration),
            Box::new(m20250601_000004_create_review_table::Migration),
            Box::new(m20250601_000005_create_category_suggestion_table::Migration),
            Box::new(m20250601_000006_create_conversation_tables::Migration),
            Box::new(m20250601_000007_create_saved_listing_table::Migration),
            Box::new(m20250601_000008_create_featured_payment_table::Migration),
            Box::new(m20250601_000009_create_site_counter_table::Migration),
        ]
    }
}
