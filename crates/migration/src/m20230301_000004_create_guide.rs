//! Create `guide` table with FK to its author.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Guide::Table)
                    .if_not_exists()
                    .col(pk_auto(Guide::Id))
                    .col(string_len(Guide::Title, 70))
                    .col(text(Guide::Content))
                    .col(text_null(Guide::Note))
                    .col(boolean(Guide::Published).default(false))
                    .col(
                        timestamp_with_time_zone(Guide::LastModified)
                            .default(Expr::current_timestamp()),
                    )
                    .col(string_len_null(Guide::CoverImage, 255))
                    .col(integer(Guide::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guide_user")
                            .from(Guide::Table, Guide::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Guide::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Guide { Table, Id, Title, Content, Note, Published, LastModified, CoverImage, UserId }

#[derive(DeriveIden)]
enum User { Table, Id }
