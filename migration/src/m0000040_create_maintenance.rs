use crate::{Now, UuidV4, m0000020_create_asset::Asset};
use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(MaintenanceDocumentStatus::MaintenanceDocumentStatus)
                    .values([
                        MaintenanceDocumentStatus::Submitted,
                        MaintenanceDocumentStatus::Approved,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(OverallCondition::OverallCondition)
                    .values([OverallCondition::Normal, OverallCondition::TidakNormal])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MaintenanceDocument::Table)
                    .col(
                        ColumnDef::new(MaintenanceDocument::Id)
                            .uuid()
                            .not_null()
                            .default(Func::cust(UuidV4))
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceDocument::Category)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceDocument::Branch)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceDocument::Department)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceDocument::SubDepartment)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceDocument::Period)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceDocument::Status)
                            .custom(MaintenanceDocumentStatus::MaintenanceDocumentStatus)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MaintenanceDocument::SubmittedBy).uuid())
                    .col(
                        ColumnDef::new(MaintenanceDocument::SubmittedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(MaintenanceDocument::ApprovedBy).uuid())
                    .col(
                        ColumnDef::new(MaintenanceDocument::ApprovedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceDocument::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Func::cust(Now)),
                    )
                    .to_owned(),
            )
            .await?;

        // at most one pending submission per grouping key
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE UNIQUE INDEX maintenance_document_submitted_idx
                    ON maintenance_document (category, branch, department, sub_department, period)
                    WHERE status = 'Submitted'
                "#,
            )
            .await
            .map(|_| ())?;

        manager
            .create_table(
                Table::create()
                    .table(MaintenanceReport::Table)
                    .col(
                        ColumnDef::new(MaintenanceReport::Id)
                            .uuid()
                            .not_null()
                            .default(Func::cust(UuidV4))
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MaintenanceReport::DocumentId).uuid())
                    .col(ColumnDef::new(MaintenanceReport::AssetId).uuid().not_null())
                    .col(ColumnDef::new(MaintenanceReport::CheckerId).uuid())
                    .col(
                        ColumnDef::new(MaintenanceReport::AntivirusUpdated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MaintenanceReport::ClearTemporary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MaintenanceReport::OverallCondition)
                            .custom(OverallCondition::OverallCondition)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceReport::InspectionDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceReport::Remarks)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(MaintenanceReport::Period).string().not_null())
                    .col(snapshot(MaintenanceReport::UserName))
                    .col(snapshot(MaintenanceReport::UserPosition))
                    .col(snapshot(MaintenanceReport::UserBranch))
                    .col(snapshot(MaintenanceReport::UserDepartment))
                    .col(snapshot(MaintenanceReport::UserSubDepartment))
                    .col(
                        ColumnDef::new(MaintenanceReport::IsSubmitted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MaintenanceReport::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(MaintenanceReport::SubmittedBy).uuid())
                    .col(ColumnDef::new(MaintenanceReport::SubmittedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(MaintenanceReport::ApprovedBy).uuid())
                    .col(ColumnDef::new(MaintenanceReport::ApprovedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(MaintenanceReport::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Func::cust(Now)),
                    )
                    .col(
                        ColumnDef::new(MaintenanceReport::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Func::cust(Now)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from_col(MaintenanceReport::AssetId)
                            .to(Asset::Table, Asset::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from_col(MaintenanceReport::DocumentId)
                            .to(MaintenanceDocument::Table, MaintenanceDocument::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(MaintenanceReport::Table)
                    .name(Indexes::MaintenanceReportAssetPeriodIdx.to_string())
                    .col(MaintenanceReport::AssetId)
                    .col(MaintenanceReport::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(MaintenanceReport::Table)
                    .name(Indexes::MaintenanceReportDocumentIdx.to_string())
                    .col(MaintenanceReport::DocumentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(MaintenanceReport::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(MaintenanceDocument::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_type(
                Type::drop()
                    .if_exists()
                    .name(OverallCondition::OverallCondition)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_type(
                Type::drop()
                    .if_exists()
                    .name(MaintenanceDocumentStatus::MaintenanceDocumentStatus)
                    .to_owned(),
            )
            .await
    }
}

fn snapshot(column: MaintenanceReport) -> ColumnDef {
    ColumnDef::new(column)
        .string()
        .not_null()
        .default("")
        .to_owned()
}

#[derive(DeriveIden)]
enum MaintenanceDocument {
    Table,
    Id,
    Category,
    Branch,
    Department,
    SubDepartment,
    Period,
    Status,
    SubmittedBy,
    SubmittedAt,
    ApprovedBy,
    ApprovedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MaintenanceReport {
    Table,
    Id,
    DocumentId,
    AssetId,
    CheckerId,
    AntivirusUpdated,
    ClearTemporary,
    OverallCondition,
    InspectionDate,
    Remarks,
    Period,
    UserName,
    UserPosition,
    UserBranch,
    UserDepartment,
    UserSubDepartment,
    IsSubmitted,
    IsApproved,
    SubmittedBy,
    SubmittedAt,
    ApprovedBy,
    ApprovedAt,
    CreatedAt,
    UpdatedAt,
}

#[allow(clippy::enum_variant_names)]
#[derive(DeriveIden)]
enum MaintenanceDocumentStatus {
    MaintenanceDocumentStatus,
    #[sea_orm(iden = "Submitted")]
    Submitted,
    #[sea_orm(iden = "Approved")]
    Approved,
}

#[derive(DeriveIden)]
enum OverallCondition {
    OverallCondition,
    #[sea_orm(iden = "Normal")]
    Normal,
    #[sea_orm(iden = "Tidak Normal")]
    TidakNormal,
}

#[derive(DeriveIden)]
enum Indexes {
    MaintenanceReportAssetPeriodIdx,
    MaintenanceReportDocumentIdx,
}
