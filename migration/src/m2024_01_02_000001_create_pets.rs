//! Migration to create the pets table.
//!
//! Pets are owned by exactly one tenant. Listing is newest-first, optionally
//! scoped to a tenant, so both columns are indexed.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pets::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Pets::TenantId).text().not_null())
                    .col(ColumnDef::new(Pets::Name).text().not_null())
                    .col(
                        ColumnDef::new(Pets::Species)
                            .text()
                            .not_null()
                            .default("other"),
                    )
                    .col(ColumnDef::new(Pets::AgeYears).integer().null())
                    .col(
                        ColumnDef::new(Pets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pets_tenant_id")
                            .from(Pets::Table, Pets::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pets_tenant_id")
                    .table(Pets::Table)
                    .col(Pets::TenantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pets_created_at")
                    .table(Pets::Table)
                    .col(Pets::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_pets_created_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_pets_tenant_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Pets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Pets {
    Table,
    Id,
    TenantId,
    Name,
    Species,
    AgeYears,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
