//! Connection pooling, migrations, and the single-writer actor.
//!
//! Reads go through a pooled connection; every write is funneled through
//! [`write_actor::WriteHandle`] so SQLite only ever sees one writer at a time.

pub mod write_actor;

use std::path::{Path, PathBuf};

use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::errors::StorageError;
use aggregator_core::errors::Result;

pub use write_actor::WriteHandle;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Alias kept for repositories that accept either a pooled connection or a
/// raw `&mut SqliteConnection` inside a [`WriteHandle::exec`] closure.
pub type DbTransactionExecutor = SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const DEFAULT_DB_FILENAME: &str = "aggregator.db";

/// Resolves the on-disk database path, creating its parent directory if
/// needed. `configured_path` is a file path or a directory; a bare directory
/// gets [`DEFAULT_DB_FILENAME`] appended.
pub fn init(configured_path: &str) -> Result<String> {
    let path = Path::new(configured_path);
    let resolved: PathBuf = if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.join(DEFAULT_DB_FILENAME)
    };

    if let Some(parent) = resolved.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| StorageError::MigrationFailed(format!("failed to create {parent:?}: {e}")))?;
    }

    Ok(resolved.to_string_lossy().into_owned())
}

pub fn get_db_path(configured_path: &str) -> Result<String> {
    init(configured_path)
}

pub fn create_pool(db_path: &str) -> Result<std::sync::Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder()
        .build(manager)
        .map_err(|e| StorageError::PoolError(e))?;
    Ok(std::sync::Arc::new(pool))
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection> {
    pool.get().map_err(|e| StorageError::PoolError(e).into())
}

pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = get_connection(pool)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
    Ok(())
}

/// Copies the database file to `destination`, used by the operator-facing
/// backup endpoint. SQLite's file is safe to copy while idle; callers are
/// expected to quiesce the writer actor first.
pub fn backup_database(db_path: &str, destination: &str) -> Result<()> {
    std::fs::copy(db_path, destination)
        .map_err(|e| StorageError::MigrationFailed(format!("backup failed: {e}")))?;
    Ok(())
}

pub fn restore_database(db_path: &str, source: &str) -> Result<()> {
    std::fs::copy(source, db_path)
        .map_err(|e| StorageError::MigrationFailed(format!("restore failed: {e}")))?;
    Ok(())
}

/// Restores into a temp file and swaps it into place only on success, so a
/// corrupt backup can never leave the live database half-overwritten.
pub fn restore_database_safe(db_path: &str, source: &str) -> Result<()> {
    let tmp_path = format!("{db_path}.restore-tmp");
    std::fs::copy(source, &tmp_path)
        .map_err(|e| StorageError::MigrationFailed(format!("restore failed: {e}")))?;
    std::fs::rename(&tmp_path, db_path)
        .map_err(|e| StorageError::MigrationFailed(format!("restore swap failed: {e}")))?;
    Ok(())
}
