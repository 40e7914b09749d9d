use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Fresh in-memory SQLite database with the full schema applied. A
/// single-connection pool keeps every statement on the same handle, so each
/// test gets its own isolated database.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1);
    let db = Database::connect(opt).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
