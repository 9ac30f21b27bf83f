//! Add `avatar` to `user_detail`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(UserDetail::Table)
                    .add_column(string_len_null(UserDetail::Avatar, 255))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(UserDetail::Table)
                    .drop_column(UserDetail::Avatar)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum UserDetail { Table, Avatar }
