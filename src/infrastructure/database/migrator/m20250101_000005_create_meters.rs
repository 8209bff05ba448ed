//! Migration to create meters table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meters::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Meters::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Meters::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Meters::Description).text().not_null())
                    .col(ColumnDef::new(Meters::TransformerId).string().not_null())
                    .col(
                        ColumnDef::new(Meters::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Meters::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meters_transformer")
                            .from(Meters::Table, Meters::TransformerId)
                            .to(Transformers::Table, Transformers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meters_transformer")
                    .table(Meters::Table)
                    .col(Meters::TransformerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Meters::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Meters {
    Table,
    Id,
    Name,
    Description,
    TransformerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Transformers {
    Table,
    Id,
}
