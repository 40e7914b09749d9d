//! Create `comments` table with FKs to `news` and `users`.
//!
//! Both FKs cascade: removing a news row or a user removes their comments.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(pk_auto(Comments::Id))
                    .col(string_len(Comments::Content, 1000).not_null())
                    .col(timestamp_with_time_zone(Comments::Created).not_null())
                    .col(timestamp_with_time_zone(Comments::Updated).not_null())
                    .col(integer(Comments::NewsId).not_null())
                    .col(uuid(Comments::UserId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_news")
                            .from(Comments::Table, Comments::NewsId)
                            .to(News::Table, News::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_user")
                            .from(Comments::Table, Comments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Comments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Comments { Table, Id, Content, Created, Updated, NewsId, UserId }

#[derive(DeriveIden)]
enum News { Table, Id }

#[derive(DeriveIden)]
enum Users { Table, Id }
