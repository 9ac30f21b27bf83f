//! Create `profession` lookup table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profession::Table)
                    .if_not_exists()
                    .col(pk_auto(Profession::Id))
                    .col(string_len(Profession::Name, 128).unique_key())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Profession::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Profession { Table, Id, Name }
