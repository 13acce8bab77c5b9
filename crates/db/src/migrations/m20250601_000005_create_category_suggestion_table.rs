//! Create category suggestion table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CategorySuggestion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CategorySuggestion::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CategorySuggestion::CategoryName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CategorySuggestion::Description).text())
                    .col(ColumnDef::new(CategorySuggestion::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(CategorySuggestion::UserName).string_len(128).not_null())
                    .col(
                        ColumnDef::new(CategorySuggestion::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(CategorySuggestion::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (admin reviews the pending queue)
        manager
            .create_index(
                Index::create()
                    .name("idx_category_suggestion_status")
                    .table(CategorySuggestion::Table)
                    .col(CategorySuggestion::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CategorySuggestion::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CategorySuggestion {
    Table,
    Id,
    CategoryName,
    Description,
    UserId,
    UserName,
    Status,
    CreatedAt,
}
