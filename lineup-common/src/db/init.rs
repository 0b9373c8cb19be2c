//! Database initialization
//!
//! Creates the database on first run, applies the schema (idempotent) and
//! seeds the reference tables.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Busy timeout applied to every pooled connection
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialize database at a file path, creating it if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = init_database_url(&db_url).await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    Ok(pool)
}

/// Initialize database from a connection URL (e.g. `DATABASE_URL`)
pub async fn init_database_url(db_url: &str) -> Result<SqlitePool> {
    // Foreign keys are set per connection so every pooled connection enforces
    // the Breed/Category/Show references.
    let options = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;
    crate::db::reference::seed_reference_data(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_breeds_table(pool).await?;
    create_categories_table(pool).await?;
    create_shows_table(pool).await?;
    create_submissions_table(pool).await?;
    create_lineups_tables(pool).await?;
    Ok(())
}

async fn create_breeds_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS breeds (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            breed_name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_categories_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_shows_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shows (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            label TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_submissions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            exhibitor_id TEXT NOT NULL,
            category_id INTEGER NOT NULL REFERENCES categories(id),
            show_id INTEGER NOT NULL REFERENCES shows(id),
            breed_id INTEGER NOT NULL REFERENCES breeds(id),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_submissions_match ON submissions(category_id, show_id, breed_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_lineups_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lineups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            show_id INTEGER NOT NULL REFERENCES shows(id),
            category_id INTEGER NOT NULL REFERENCES categories(id),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // position keeps the organizer's breed order
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lineup_breeds (
            lineup_id INTEGER NOT NULL REFERENCES lineups(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            breed_id INTEGER NOT NULL REFERENCES breeds(id),
            PRIMARY KEY (lineup_id, position),
            UNIQUE (lineup_id, breed_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_database_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("lineup.db");

        let pool = init_database(&db_path).await.expect("init should succeed");
        assert!(db_path.exists());

        for table in ["breeds", "categories", "shows", "submissions", "lineups", "lineup_breeds"] {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }

    #[tokio::test]
    async fn reopening_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("lineup.db");

        let first = init_database(&db_path).await.unwrap();
        let breeds_first: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM breeds")
            .fetch_one(&first)
            .await
            .unwrap();
        first.close().await;

        let second = init_database(&db_path).await.unwrap();
        let breeds_second: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM breeds")
            .fetch_one(&second)
            .await
            .unwrap();

        assert_eq!(breeds_first, breeds_second);
    }
}
