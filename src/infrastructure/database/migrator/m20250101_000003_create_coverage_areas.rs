//! Migration to create coverage_areas table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CoverageAreas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoverageAreas::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CoverageAreas::Type)
                            .string_len(15)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoverageAreas::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CoverageAreas::Description).text().not_null())
                    .col(ColumnDef::new(CoverageAreas::ParentId).string().null())
                    .col(
                        ColumnDef::new(CoverageAreas::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoverageAreas::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coverage_areas_parent")
                            .from(CoverageAreas::Table, CoverageAreas::ParentId)
                            .to(CoverageAreas::Table, CoverageAreas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One area name per administrative level
        manager
            .create_index(
                Index::create()
                    .name("idx_coverage_areas_name_type")
                    .table(CoverageAreas::Table)
                    .col(CoverageAreas::Name)
                    .col(CoverageAreas::Type)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_coverage_areas_parent")
                    .table(CoverageAreas::Table)
                    .col(CoverageAreas::ParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CoverageAreas::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CoverageAreas {
    Table,
    Id,
    Type,
    Name,
    Description,
    ParentId,
    CreatedAt,
    UpdatedAt,
}
