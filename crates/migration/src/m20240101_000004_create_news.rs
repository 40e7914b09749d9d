//! Create `news` table with FK to `category`.
//!
//! Deleting a category with dependent news is rejected (RESTRICT); image
//! references are a JSON list so the schema is portable across backends.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(News::Table)
                    .if_not_exists()
                    .col(pk_auto(News::Id))
                    .col(string_len(News::Title, 100).not_null())
                    .col(text_null(News::Content))
                    .col(json_null(News::Images))
                    .col(timestamp_with_time_zone(News::Created).not_null())
                    .col(timestamp_with_time_zone(News::Updated).not_null())
                    .col(integer(News::CategoryId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_news_category")
                            .from(News::Table, News::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(News::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum News { Table, Id, Title, Content, Images, Created, Updated, CategoryId }

#[derive(DeriveIden)]
enum Category { Table, Id }
