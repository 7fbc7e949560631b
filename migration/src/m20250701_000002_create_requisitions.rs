//! Migration to create the requisitions table
//!
//! Nested `dataTypes` / `slNoData` rows are stored as JSON arrays on the
//! requisition row; approval fields stay NULL until the matching transition.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Requisitions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Requisitions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Requisitions::Subject).string().not_null())
                    .col(ColumnDef::new(Requisitions::DateOfRequisition).date())
                    .col(ColumnDef::new(Requisitions::ProjectDistrict).string())
                    .col(ColumnDef::new(Requisitions::Sheet).string())
                    .col(ColumnDef::new(Requisitions::Remark).text())
                    .col(ColumnDef::new(Requisitions::DataTypes).json_binary().not_null())
                    .col(ColumnDef::new(Requisitions::SlNoData).json_binary().not_null())
                    .col(ColumnDef::new(Requisitions::PreparedBySignature).string())
                    .col(ColumnDef::new(Requisitions::PreparedByDesignation).string())
                    .col(ColumnDef::new(Requisitions::GroupCoordinatorSignature).string())
                    .col(ColumnDef::new(Requisitions::GroupCoordinatorDesignation).string())
                    .col(ColumnDef::new(Requisitions::RequesterUserId).string().not_null())
                    .col(
                        ColumnDef::new(Requisitions::CurrentApprovalStatus)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Requisitions::L2ApproverId).string())
                    .col(ColumnDef::new(Requisitions::L2ApprovalDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Requisitions::L2Comments).text())
                    .col(ColumnDef::new(Requisitions::L3ApproverId).string())
                    .col(ColumnDef::new(Requisitions::L3ApprovalDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Requisitions::L3Comments).text())
                    .col(
                        ColumnDef::new(Requisitions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for data_entry visibility (own requisitions)
        manager
            .create_index(
                Index::create()
                    .name("idx_requisitions_requester_user_id")
                    .table(Requisitions::Table)
                    .col(Requisitions::RequesterUserId)
                    .to_owned(),
            )
            .await?;

        // Index for reviewer queues and dashboard breakdown
        manager
            .create_index(
                Index::create()
                    .name("idx_requisitions_status")
                    .table(Requisitions::Table)
                    .col(Requisitions::CurrentApprovalStatus)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Requisitions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Requisitions {
    Table,
    Id,
    Subject,
    DateOfRequisition,
    ProjectDistrict,
    Sheet,
    Remark,
    DataTypes,
    SlNoData,
    PreparedBySignature,
    PreparedByDesignation,
    GroupCoordinatorSignature,
    GroupCoordinatorDesignation,
    RequesterUserId,
    CurrentApprovalStatus,
    L2ApproverId,
    L2ApprovalDate,
    L2Comments,
    L3ApproverId,
    L3ApprovalDate,
    L3Comments,
    CreatedAt,
}
