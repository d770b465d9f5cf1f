use crate::{Now, UuidV4, m0000010_create_employee::Employee};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Asset::Table)
                    .col(
                        ColumnDef::new(Asset::Id)
                            .uuid()
                            .not_null()
                            .default(Func::cust(UuidV4))
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Asset::InventoryNumber).string().not_null())
                    .col(ColumnDef::new(Asset::SerialNumber).string())
                    .col(ColumnDef::new(Asset::AssetName).string().not_null())
                    .col(ColumnDef::new(Asset::DeviceName).string())
                    .col(ColumnDef::new(Asset::Category).string().not_null())
                    .col(ColumnDef::new(Asset::Brand).string())
                    .col(ColumnDef::new(Asset::TypeModel).string())
                    .col(
                        ColumnDef::new(Asset::Status)
                            .string()
                            .not_null()
                            .default("Ready"),
                    )
                    .col(ColumnDef::new(Asset::EmployeeId).uuid())
                    .col(
                        ColumnDef::new(Asset::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Func::cust(Now)),
                    )
                    .col(
                        ColumnDef::new(Asset::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Func::cust(Now)),
                    )
                    .col(ColumnDef::new(Asset::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .from_col(Asset::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Asset::Table)
                    .name(Indexes::AssetCategoryIdx.to_string())
                    .col(Asset::Category)
                    .to_owned(),
            )
            .await?;

        // inventory numbers may be reused once the previous asset got removed
        manager
            .get_connection()
            .execute_unprepared(
                r#"CREATE UNIQUE INDEX asset_inventory_number_idx ON asset (inventory_number) WHERE deleted_at IS NULL"#,
            )
            .await
            .map(|_| ())?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Asset::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Asset {
    Table,
    Id,
    InventoryNumber,
    SerialNumber,
    AssetName,
    DeviceName,
    Category,
    Brand,
    TypeModel,
    Status,
    EmployeeId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Indexes {
    AssetCategoryIdx,
}
