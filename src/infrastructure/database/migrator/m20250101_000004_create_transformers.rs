//! Migration to create transformers table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transformers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transformers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transformers::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Transformers::Description).text().not_null())
                    .col(
                        ColumnDef::new(Transformers::CoverageAreaId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transformers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transformers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transformers_coverage_area")
                            .from(Transformers::Table, Transformers::CoverageAreaId)
                            .to(CoverageAreas::Table, CoverageAreas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transformers_coverage_area")
                    .table(Transformers::Table)
                    .col(Transformers::CoverageAreaId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transformers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Transformers {
    Table,
    Id,
    Name,
    Description,
    CoverageAreaId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CoverageAreas {
    Table,
    Id,
}
