// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection management for the SQLite document store.
//!
//! One `rusqlite::Connection` per database, shared by every collection handle
//! behind a mutex. All bulk requests against the same database are therefore
//! serialized.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use docbulk_config::StorageConfig;
use docbulk_core::{Database, DocbulkError};

use crate::collection::SqliteCollection;
use crate::migrations;

pub(crate) type SharedConnection = Arc<Mutex<Connection>>;

/// Convert any storage-layer error into `DocbulkError::Storage`.
pub(crate) fn storage_err<E>(e: E) -> DocbulkError
where
    E: std::error::Error + Send + Sync + 'static,
{
    DocbulkError::Storage {
        source: Box::new(e),
    }
}

pub(crate) fn lock(conn: &SharedConnection) -> Result<MutexGuard<'_, Connection>, DocbulkError> {
    conn.lock()
        .map_err(|_| DocbulkError::Internal("sqlite connection mutex poisoned".to_string()))
}

/// A SQLite file (or in-memory database) holding JSON document collections.
#[derive(Clone)]
pub struct SqliteDatabase {
    conn: SharedConnection,
}

impl SqliteDatabase {
    /// Open (creating if needed) the database described by `config`.
    ///
    /// Applies busy timeout and journal mode, then runs migrations.
    pub fn open(config: &StorageConfig) -> Result<Self, DocbulkError> {
        let path = Path::new(&config.database_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(storage_err)?;
        }

        let conn = Connection::open(path).map_err(storage_err)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(storage_err)?;
        if config.wal_mode {
            let mode: String = conn
                .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
                .map_err(storage_err)?;
            debug!(journal_mode = %mode, "journal mode set");
        }

        let db = Self::from_connection(conn)?;
        debug!(path = %config.database_path, "sqlite document store opened");
        Ok(db)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, DocbulkError> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, DocbulkError> {
        migrations::run_migrations(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Names of collections that currently hold at least one document.
    pub fn collection_names(&self) -> Result<Vec<String>, DocbulkError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT collection FROM documents ORDER BY collection")
            .map_err(storage_err)?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(storage_err)?
            .collect::<Result<Vec<String>, _>>()
            .map_err(storage_err)?;
        Ok(names)
    }
}

impl Database for SqliteDatabase {
    type Collection = SqliteCollection;

    fn collection(&self, name: &str) -> Result<SqliteCollection, DocbulkError> {
        if name.trim().is_empty() {
            return Err(DocbulkError::CollectionUnavailable {
                name: name.to_string(),
                source: "collection name must not be empty".into(),
            });
        }
        Ok(SqliteCollection::new(name, Arc::clone(&self.conn)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn in_memory_database_opens() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        assert!(db.collection_names().unwrap().is_empty());
    }

    #[test]
    fn file_database_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.db");
        let config = StorageConfig {
            database_path: path.to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };

        SqliteDatabase::open(&config).unwrap();
        assert!(path.exists());

        // Migrations are idempotent on reopen.
        SqliteDatabase::open(&config).unwrap();
    }

    #[test]
    fn empty_collection_name_is_unavailable() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let err = db.collection("  ").err().expect("empty name should fail");
        assert!(matches!(err, DocbulkError::CollectionUnavailable { .. }));
    }
}
