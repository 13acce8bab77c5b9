//! Create site counter table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SiteCounter::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SiteCounter::Name)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SiteCounter::Value).big_integer().not_null().default(0))
                    .to_owned(),
            )
            .await?;

        // Seed the known counters so increments always have a row to hit.
        let insert = Query::insert()
            .into_table(SiteCounter::Table)
            .columns([SiteCounter::Name, SiteCounter::Value])
            .values_panic(["user_count".into(), 0.into()])
            .values_panic(["approved_listing_count".into(), 0.into()])
            .to_owned();
        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SiteCounter::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SiteCounter {
    Table,
    Name,
    Value,
}
