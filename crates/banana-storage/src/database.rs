// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-command connection setup.
//!
//! The executor opens one connection per command and drops it right after.
//! Connections are never shared or pooled.

use std::time::Duration;

use banana_config::StorageConfig;
use rusqlite::Connection;
use tracing::trace;

/// Open a connection to the configured database and apply PRAGMAs.
pub fn open_connection(config: &StorageConfig) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(&config.database_path)?;
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    if config.wal_mode {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    }
    trace!(path = %config.database_path, "connection opened");
    Ok(conn)
}
