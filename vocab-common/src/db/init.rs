//! Database initialization
//!
//! Creates the database file and schema on first run. Schema creation is
//! idempotent and runs at every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// SQLite busy timeout applied to every pooled connection
pub const BUSY_TIMEOUT_MS: u64 = 5000;

/// Open (or create) the database file and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // WAL allows concurrent readers alongside the single writer
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with the schema applied
///
/// Each in-memory connection is its own database, so the pool is pinned
/// to one connection that never expires.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_vocabularies_table(pool).await?;
    create_terms_table(pool).await?;
    Ok(())
}

/// Create the vocabularies table
///
/// One record per registered term source, keyed by its unique prefix.
pub async fn create_vocabularies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vocabularies (
            guid TEXT PRIMARY KEY,
            prefix TEXT NOT NULL UNIQUE,
            label TEXT NOT NULL UNIQUE,
            base_url TEXT,
            description TEXT,
            concept TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_vocabularies_concept ON vocabularies(concept)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the terms table
///
/// `(vocabulary_guid, termid)` is unique; deleting a vocabulary deletes its terms.
/// `termid_lower` and `label_lower` hold Unicode lower-cased copies for
/// case-insensitive lookups (SQLite `NOCASE` only folds ASCII).
pub async fn create_terms_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS terms (
            guid TEXT PRIMARY KEY,
            vocabulary_guid TEXT NOT NULL REFERENCES vocabularies(guid) ON DELETE CASCADE,
            termid TEXT NOT NULL,
            label TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            termid_lower TEXT NOT NULL DEFAULT '',
            label_lower TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(vocabulary_guid, termid)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_terms_label ON terms(vocabulary_guid, label_lower)")
        .execute(pool)
        .await?;

    Ok(())
}
