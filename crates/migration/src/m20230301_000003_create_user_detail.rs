//! Create `user_detail` table, the one-to-one profile extension of `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserDetail::Table)
                    .if_not_exists()
                    .col(pk_auto(UserDetail::Id))
                    .col(integer(UserDetail::UserId).unique_key())
                    .col(text_null(UserDetail::Bio))
                    .col(integer_null(UserDetail::ProfessionId))
                    .col(boolean(UserDetail::IsInstructor).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_detail_user")
                            .from(UserDetail::Table, UserDetail::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_detail_profession")
                            .from(UserDetail::Table, UserDetail::ProfessionId)
                            .to(Profession::Table, Profession::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserDetail::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserDetail { Table, Id, UserId, Bio, ProfessionId, IsInstructor }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Profession { Table, Id }
