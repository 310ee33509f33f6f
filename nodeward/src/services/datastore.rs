//! Local key/value datastore.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};

use nodeward_shared::{NodewardError, NodewardResult};

/// SQLite-backed key/value store for node-local state.
///
/// The connection is guarded by a mutex so the store can be shared behind
/// an `Arc` without the caller holding an exclusive handle.
#[derive(Debug)]
pub struct Datastore {
    conn: Mutex<Connection>,
}

impl Datastore {
    /// Open (or create) the datastore at the given path.
    ///
    /// Parent directories are created as needed.
    pub fn open(path: &Path) -> NodewardResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                NodewardError::Storage(format!(
                    "could not create datastore directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let conn = Connection::open(path).map_err(|e| {
            NodewardError::Storage(format!("could not open datastore {}: {e}", path.display()))
        })?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .map_err(|e| NodewardError::Storage(format!("could not initialize datastore: {e}")))?;

        tracing::debug!(path = %path.display(), "Opened datastore");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Look up a value. Missing keys yield `Ok(None)`.
    pub fn get(&self, key: &str) -> NodewardResult<Option<String>> {
        let conn = self.conn.lock();
        conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|e| NodewardError::Storage(format!("datastore get {key:?}: {e}")))
    }

    /// Insert or replace a value.
    pub fn put(&self, key: &str, value: &str) -> NodewardResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(|e| NodewardError::Storage(format!("datastore put {key:?}: {e}")))?;
        Ok(())
    }

    /// Delete a key. Deleting a missing key is a no-op.
    pub fn delete(&self, key: &str) -> NodewardResult<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| NodewardError::Storage(format!("datastore delete {key:?}: {e}")))?;
        Ok(())
    }
}
