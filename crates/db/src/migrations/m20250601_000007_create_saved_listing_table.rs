//! Create saved listing table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SavedListing::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SavedListing::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(SavedListing::ListingId).string_len(32).not_null())
                    .col(ColumnDef::new(SavedListing::Title).string_len(256).not_null())
                    .col(
                        ColumnDef::new(SavedListing::SavedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(SavedListing::UserId)
                            .col(SavedListing::ListingId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_listing_user")
                            .from(SavedListing::Table, SavedListing::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SavedListing::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SavedListing {
    Table,
    UserId,
    ListingId,
    Title,
    SavedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
