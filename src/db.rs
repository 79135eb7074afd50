use migration::Migrator;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;

use crate::error::StoreResult;

const PRAGMAS: [&str; 3] =
    ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL", "PRAGMA cache_size=-64000"];

pub async fn connect_and_migrate(database_url: &str) -> StoreResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_string());
    // Every pooled connection to :memory: would otherwise open its own empty database.
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    open(options).await
}

async fn open(options: ConnectOptions) -> StoreResult<DatabaseConnection> {
    let db = Database::connect(options).await?;

    for pragma in PRAGMAS {
        db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string())).await?;
    }

    migrate(&db).await?;
    Ok(db)
}

/// Applies pending migrations. Safe to call on an already initialized database.
pub async fn migrate(db: &DatabaseConnection) -> StoreResult<()> {
    let pending = Migrator::get_pending_migrations(db).await?.len();
    Migrator::up(db, None).await?;
    tracing::info!(applied = pending, "schema up to date");
    Ok(())
}

#[cfg(test)]
pub async fn memory_db() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:").await.expect("in-memory database")
}

/// A migrated on-disk database behind a multi-connection pool, for tests that
/// need writers to actually contend. Keep the directory alive while in use.
#[cfg(test)]
pub async fn file_db() -> (tempfile::TempDir, DatabaseConnection) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("moviebot.db").display());
    let mut options = ConnectOptions::new(url);
    options.max_connections(4).min_connections(4);
    let db = open(options).await.expect("file database");
    (dir, db)
}
