//! SQLite-backed progress storage

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use super::backend::ProgressBackend;
use crate::error::Result;

/// Key-value table in an embedded SQLite database
pub struct SqliteBackend {
    db: Connection,
}

impl SqliteBackend {
    pub const FILE_NAME: &'static str = "progress.db";

    /// Open or create `progress.db` inside `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let db_path = data_dir.join(Self::FILE_NAME);
        let db = Connection::open(&db_path)?;

        db.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(&db)?;

        info!(path = %db_path.display(), "Progress database opened");
        Ok(Self { db })
    }

    /// Private in-memory database
    pub fn in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        Self::init(&db)?;
        Ok(Self { db })
    }

    fn init(db: &Connection) -> Result<()> {
        db.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            );",
        )?;
        Ok(())
    }
}

impl ProgressBackend for SqliteBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.db.prepare_cached("SELECT value FROM kv WHERE key = ?1")?;

        let result = stmt.query_row([key], |row| row.get::<_, String>(0));

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.db.execute(
            "INSERT INTO kv (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now'))
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = strftime('%s', 'now')",
            rusqlite::params![key, value],
        )?;
        debug!(key, bytes = value.len(), "Saved progress");
        Ok(())
    }
}
