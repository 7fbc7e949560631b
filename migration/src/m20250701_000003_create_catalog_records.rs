//! Migration to create the catalog_records table
//!
//! One row per submitted block/survey/acquisition/processing/interpretation
//! form (and their media variants). The submitted field map is kept as JSON.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CatalogRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CatalogRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CatalogRecords::Kind).string_len(32).not_null())
                    .col(ColumnDef::new(CatalogRecords::RecordKey).string().not_null())
                    .col(ColumnDef::new(CatalogRecords::Fields).json_binary().not_null())
                    .col(
                        ColumnDef::new(CatalogRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Key is unique per kind (a survey_id may equal a block_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_catalog_records_kind_key")
                    .table(CatalogRecords::Table)
                    .col(CatalogRecords::Kind)
                    .col(CatalogRecords::RecordKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CatalogRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CatalogRecords {
    Table,
    Id,
    Kind,
    RecordKey,
    Fields,
    CreatedAt,
}
