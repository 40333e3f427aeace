use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::migration::Migrator;

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    // An in-memory SQLite database lives inside a single connection.
    if database_url.starts_with("sqlite::memory:") {
        options.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Bring the schema up to date.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    Migrator::up(conn, None).await?;
    tracing::info!("database migrations applied");
    Ok(())
}
