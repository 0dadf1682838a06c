// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use promptdeck_core::PromptdeckError;
use tracing::debug;

use crate::migrations::run_migrations;

/// Convert a tokio-rusqlite error into `PromptdeckError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> PromptdeckError {
    PromptdeckError::Storage {
        source: Box::new(e),
    }
}

fn pragmas(wal_mode: bool) -> &'static str {
    if wal_mode {
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;"
    } else {
        "PRAGMA journal_mode = DELETE;
         PRAGMA synchronous = FULL;
         PRAGMA busy_timeout = 5000;"
    }
}

/// Handle to the card database: one tokio-rusqlite connection that owns all writes.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` and bring its schema up to date.
    ///
    /// Migrations run on a blocking thread with a short-lived plain connection
    /// before the long-lived async connection is opened.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, PromptdeckError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(PromptdeckError::storage)?;
            }
        }

        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), PromptdeckError> {
            let mut conn =
                rusqlite::Connection::open(&migrate_path).map_err(PromptdeckError::storage)?;
            conn.execute_batch(pragmas(wal_mode))
                .map_err(PromptdeckError::storage)?;
            run_migrations(&mut conn)
        })
        .await
        .map_err(|e| PromptdeckError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(PromptdeckError::storage)?;
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(pragmas(wal_mode))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The single writer connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), PromptdeckError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(PromptdeckError::storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_parent_dirs_and_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/cards.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();

        let tables: Vec<String> = db
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .await
            .unwrap();
        assert!(tables.contains(&"cards".to_string()));
        assert!(path.exists());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_does_not_rerun_migrations() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cards.db");
        let path = path.to_str().unwrap();

        Database::open(path, true).await.unwrap().close().await.unwrap();
        let db = Database::open(path, true).await.unwrap();
        let applied: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT COUNT(*) FROM refinery_schema_history",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(applied, 1);
    }

    #[tokio::test]
    async fn wal_mode_is_applied() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wal.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        let mode: String = db
            .connection()
            .call(|conn| -> Result<String, rusqlite::Error> {
                conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
