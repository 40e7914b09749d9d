//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_category;
mod m20240101_000002_create_users;
mod m20240101_000003_create_user_credentials;
mod m20240101_000004_create_news;
mod m20240101_000005_create_comments;
mod m20240101_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_category::Migration),
            Box::new(m20240101_000002_create_users::Migration),
            Box::new(m20240101_000003_create_user_credentials::Migration),
            Box::new(m20240101_000004_create_news::Migration),
            Box::new(m20240101_000005_create_comments::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000006_add_indexes::Migration),
        ]
    }
}
