//! Migration to create readings table
//!
//! The unified time-series table. Query patterns are covered by the
//! composite (source, type, timestamp) indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Readings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Readings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Readings::MeterId).string().null())
                    .col(ColumnDef::new(Readings::TransformerId).string().null())
                    .col(
                        ColumnDef::new(Readings::ReadingType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Readings::Value).double().not_null())
                    .col(
                        ColumnDef::new(Readings::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Readings::IsEstimated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Readings::ConfidenceScore).double().null())
                    .col(ColumnDef::new(Readings::SourceInfo).string_len(200).null())
                    .col(
                        ColumnDef::new(Readings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Readings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_readings_meter")
                            .from(Readings::Table, Readings::MeterId)
                            .to(Meters::Table, Meters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_readings_transformer")
                            .from(Readings::Table, Readings::TransformerId)
                            .to(Transformers::Table, Transformers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_readings_type_time")
                    .table(Readings::Table)
                    .col(Readings::ReadingType)
                    .col(Readings::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_readings_meter_type_time")
                    .table(Readings::Table)
                    .col(Readings::MeterId)
                    .col(Readings::ReadingType)
                    .col(Readings::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_readings_transformer_type_time")
                    .table(Readings::Table)
                    .col(Readings::TransformerId)
                    .col(Readings::ReadingType)
                    .col(Readings::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_readings_time")
                    .table(Readings::Table)
                    .col(Readings::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Readings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Readings {
    Table,
    Id,
    MeterId,
    TransformerId,
    ReadingType,
    Value,
    Timestamp,
    IsEstimated,
    ConfidenceScore,
    SourceInfo,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Meters {
    Table,
    Id,
}

#[derive(Iden)]
enum Transformers {
    Table,
    Id,
}
