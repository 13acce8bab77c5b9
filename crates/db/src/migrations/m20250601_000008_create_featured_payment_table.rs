//! Create featured payment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeaturedPayment::Table)
                    .if_not_exists()
                    // Gateway session id; uniqueness is what makes webhook
                    // replays no-ops.
                    .col(
                        ColumnDef::new(FeaturedPayment::SessionId)
                            .string_len(128)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeaturedPayment::ListingId).string_len(32).not_null())
                    .col(ColumnDef::new(FeaturedPayment::AmountCents).big_integer().not_null())
                    .col(
                        ColumnDef::new(FeaturedPayment::FeaturedUntil)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeaturedPayment::ReceivedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_featured_payment_listing_id")
                    .table(FeaturedPayment::Table)
                    .col(FeaturedPayment::ListingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeaturedPayment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FeaturedPayment {
    Table,
    SessionId,
    ListingId,
    AmountCents,
    FeaturedUntil,
    ReceivedAt,
}
