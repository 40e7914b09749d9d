use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // News: index on category_id
        manager
            .create_index(
                Index::create()
                    .name("idx_news_category")
                    .table(News::Table)
                    .col(News::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Comments: index on news_id (list filter) and user_id (ownership checks)
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_news")
                    .table(Comments::Table)
                    .col(Comments::NewsId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_user")
                    .table(Comments::Table)
                    .col(Comments::UserId)
                    .to_owned(),
            )
            .await?;

        // UserCredentials: one credentials row per user
        manager
            .create_index(
                Index::create()
                    .name("uniq_user_credentials_user")
                    .table(UserCredentials::Table)
                    .col(UserCredentials::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_news_category").table(News::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_comments_news").table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_comments_user").table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop().name("uniq_user_credentials_user").table(UserCredentials::Table).to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum News { Table, CategoryId }

#[derive(DeriveIden)]
enum Comments { Table, NewsId, UserId }

#[derive(DeriveIden)]
enum UserCredentials { Table, UserId }
