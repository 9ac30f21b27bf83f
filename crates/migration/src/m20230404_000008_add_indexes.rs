use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Guide: author lookups and list ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_guide_user")
                    .table(Guide::Table)
                    .col(Guide::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_guide_last_modified")
                    .table(Guide::Table)
                    .col(Guide::LastModified)
                    .to_owned(),
            )
            .await?;

        // UserDetail: profession filter
        manager
            .create_index(
                Index::create()
                    .name("idx_user_detail_profession")
                    .table(UserDetail::Table)
                    .col(UserDetail::ProfessionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_guide_user").table(Guide::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_guide_last_modified").table(Guide::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_detail_profession").table(UserDetail::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Guide { Table, UserId, LastModified }

#[derive(DeriveIden)]
enum UserDetail { Table, ProfessionId }
