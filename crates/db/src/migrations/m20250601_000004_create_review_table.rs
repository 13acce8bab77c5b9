//! Create review table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Review::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Review::ReviewedUserId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::Rating).integer().not_null())
                    .col(ColumnDef::new(Review::Comment).text().not_null())
                    .col(ColumnDef::new(Review::ReviewerId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::ReviewerName).string_len(128).not_null())
                    // No FK: reviews outlive the listing they came from.
                    .col(ColumnDef::new(Review::ListingId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_reviewed_user")
                            .from(Review::Table, Review::ReviewedUserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: reviewed_user_id (reviews are listed per profile)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_reviewed_user_id")
                    .table(Review::Table)
                    .col(Review::ReviewedUserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
    ReviewedUserId,
    Rating,
    Comment,
    ReviewerId,
    ReviewerName,
    ListingId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
