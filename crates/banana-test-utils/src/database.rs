// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scratch SQLite databases for integration tests.

use banana_config::{ExecutorConfig, StorageConfig};
use rusqlite::Connection;
use tempfile::TempDir;

/// A database file inside a temporary directory, removed on drop.
pub struct TestDatabase {
    _dir: TempDir,
    storage: StorageConfig,
}

impl TestDatabase {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let storage = StorageConfig {
            database_path: dir.path().join("test.db").display().to_string(),
            busy_timeout_ms: 2000,
            wal_mode: true,
        };
        Self { _dir: dir, storage }
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Executor settings with a recognizable thread name.
    pub fn executor(&self, queue_capacity: Option<usize>) -> ExecutorConfig {
        ExecutorConfig {
            queue_capacity,
            thread_name: "banana-test-executor".to_string(),
        }
    }

    /// Open a separate connection for assertions.
    pub fn connect(&self) -> Connection {
        Connection::open(&self.storage.database_path).expect("failed to open test database")
    }

    /// Row count of `table`, or `None` if it does not exist.
    pub fn row_count(&self, table: &str) -> Option<i64> {
        if !self.table_exists(table) {
            return None;
        }
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", table.replace('"', "\"\""));
        Some(
            self.connect()
                .query_row(&sql, [], |row| row.get(0))
                .expect("count query failed"),
        )
    }

    pub fn table_exists(&self, table: &str) -> bool {
        let count: i64 = self
            .connect()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .expect("sqlite_master query failed");
        count > 0
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}
