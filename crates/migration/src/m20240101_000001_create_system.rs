//! Create `system` table.
//!
//! `system_id` comes from the table's identity sequence, so identifiers are never reused.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(System::Table)
                    .if_not_exists()
                    .col(pk_auto(System::SystemId))
                    .col(
                        string_len(System::Name, 255)
                            .not_null()
                            .check(Expr::col(System::Name).ne("")),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(System::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum System { Table, SystemId, Name }
