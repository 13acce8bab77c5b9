//! Create moderation message table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModerationMessage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModerationMessage::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ModerationMessage::ListingId).string_len(32).not_null())
                    .col(ColumnDef::new(ModerationMessage::Text).text().not_null())
                    .col(ColumnDef::new(ModerationMessage::SenderId).string_len(32).not_null())
                    .col(ColumnDef::new(ModerationMessage::SenderName).string_len(128).not_null())
                    .col(
                        ColumnDef::new(ModerationMessage::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ModerationMessage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moderation_message_listing")
                            .from(ModerationMessage::Table, ModerationMessage::ListingId)
                            .to(Listing::Table, Listing::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: listing_id (messages are read per listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_moderation_message_listing_id")
                    .table(ModerationMessage::Table)
                    .col(ModerationMessage::ListingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModerationMessage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ModerationMessage {
    Table,
    Id,
    ListingId,
    Text,
    SenderId,
    SenderName,
    IsRead,
    CreatedAt,
}

#[derive(Iden)]
enum Listing {
    Table,
    Id,
}
