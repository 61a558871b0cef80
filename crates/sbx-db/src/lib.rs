pub mod models;
pub mod repositories;

use std::{path::Path, str::FromStr};

use anyhow::Context;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

/// Create an SQLite connection pool for the database file at `db_path`.
///
/// The file is created if it does not exist yet. Foreign keys are enforced on
/// every connection so that deleting a topic cascades to its categories and
/// suggestions.
pub async fn create_pool(db_path: impl AsRef<Path>, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(db_path.as_ref())
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open database at {}", db_path.as_ref().display()))?;

    Ok(pool)
}

/// Create a pool backed by a private in-memory database.
///
/// Every SQLite connection to `:memory:` sees its own database, so the pool is
/// pinned to a single connection that is never recycled.
pub async fn create_memory_pool() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("failed to open in-memory database")?;

    Ok(pool)
}

/// Run the migrations in this crate's `migrations/` folder.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    // Bundled at compile time from `migrations/`
    sqlx::migrate!().run(pool).await.context("failed to run migrations")?;

    tracing::debug!("database migrations applied");
    Ok(())
}
