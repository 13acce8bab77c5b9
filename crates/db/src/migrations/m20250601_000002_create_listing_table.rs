//! Create listing table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listing::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Listing::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Listing::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Listing::Description).text().not_null())
                    .col(ColumnDef::new(Listing::Price).string_len(64).not_null())
                    .col(ColumnDef::new(Listing::Category).string_len(32).not_null())
                    .col(ColumnDef::new(Listing::Details).json_binary().not_null())
                    .col(ColumnDef::new(Listing::PostalCode).string_len(16))
                    .col(ColumnDef::new(Listing::City).string_len(128))
                    .col(ColumnDef::new(Listing::State).string_len(64))
                    .col(ColumnDef::new(Listing::ImageUrl).string_len(1024))
                    .col(ColumnDef::new(Listing::Gallery).json_binary().not_null())
                    .col(ColumnDef::new(Listing::OwnerId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Listing::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Listing::IsFeatured).boolean().not_null().default(false))
                    .col(ColumnDef::new(Listing::FeaturedUntil).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Listing::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Listing::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_owner")
                            .from(Listing::Table, Listing::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (moderation queue, public visibility predicate)
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_status")
                    .table(Listing::Table)
                    .col(Listing::Status)
                    .to_owned(),
            )
            .await?;

        // Index: (status, category) for public browsing
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_status_category")
                    .table(Listing::Table)
                    .col(Listing::Status)
                    .col(Listing::Category)
                    .to_owned(),
            )
            .await?;

        // Index: owner_id
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_owner_id")
                    .table(Listing::Table)
                    .col(Listing::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_created_at")
                    .table(Listing::Table)
                    .col(Listing::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listing::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Listing {
    Table,
    Id,
    Title,
    Description,
    Price,
    Category,
    Details,
    PostalCode,
    City,
    State,
    ImageUrl,
    Gallery,
    OwnerId,
    Status,
    IsFeatured,
    FeaturedUntil,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
