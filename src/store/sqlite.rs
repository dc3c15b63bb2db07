//! SQLite-backed document store
//!
//! Documents live in a single `documents` table as JSON text keyed by
//! (collection, id), each with a version that increments on every write.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use super::{Collection, CommitBatch, DocKey, DocumentStore, StoreError, VersionedDoc, Write};

const SCHEMA_VERSION: i32 = 1;

/// Document store over a shared SQLite connection
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL lets the CLI and other processes read while one writes
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(Duration::from_secs(5))?;

        Self::from_connection(conn)
    }

    /// Private database that disappears when the store is dropped
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;
        if version < SCHEMA_VERSION {
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (?1)", [SCHEMA_VERSION])?;
        }
        Ok(())
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            [collection.as_str()],
            |r| r.get(0),
        )?;
        Ok(count as u64)
    }
}

impl DocumentStore for SqliteStore {
    fn fetch(&self, key: &DocKey) -> Result<Option<VersionedDoc>, StoreError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT version, body FROM documents WHERE collection = ?1 AND id = ?2",
                params![key.collection.as_str(), key.id],
                |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((version, body)) => Ok(Some(VersionedDoc {
                version,
                body: serde_json::from_str(&body)?,
            })),
            None => Ok(None),
        }
    }

    fn commit(&self, batch: CommitBatch) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        // IMMEDIATE takes the write lock up front so the version check and
        // the writes see the same snapshot, even across processes.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        for (key, expected) in &batch.expected {
            let current: Option<i64> = tx
                .query_row(
                    "SELECT version FROM documents WHERE collection = ?1 AND id = ?2",
                    params![key.collection.as_str(), key.id],
                    |r| r.get(0),
                )
                .optional()?;
            if current != *expected {
                return Err(StoreError::Conflict(key.to_string()));
            }
        }

        let now = Utc::now().timestamp_millis();
        for (key, write) in &batch.writes {
            match write {
                Write::Put(body) => {
                    tx.execute(
                        r#"INSERT INTO documents (collection, id, version, body, updated_at)
                           VALUES (?1, ?2, 1, ?3, ?4)
                           ON CONFLICT(collection, id) DO UPDATE SET
                               version = version + 1, body = excluded.body, updated_at = excluded.updated_at"#,
                        params![key.collection.as_str(), key.id, body.to_string(), now],
                    )?;
                }
                Write::Delete => {
                    tx.execute(
                        "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                        params![key.collection.as_str(), key.id],
                    )?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    version INTEGER NOT NULL,
    body TEXT NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (collection, id)
);

CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_and_init() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("nested/ascend.db")).unwrap();

        let conn = store.conn().unwrap();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"documents".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
    }

    #[test]
    fn test_versions_increment_and_conflicts_roll_back() {
        let store = SqliteStore::open_in_memory().unwrap();
        let user = DocKey::new(Collection::Users, "u1");
        let habit = DocKey::new(Collection::Habits, "h1");

        store
            .commit(CommitBatch {
                expected: vec![(user.clone(), None)],
                writes: vec![(user.clone(), Write::Put(serde_json::json!({"coins": 1})))],
            })
            .unwrap();
        store
            .commit(CommitBatch {
                expected: vec![(user.clone(), Some(1))],
                writes: vec![(user.clone(), Write::Put(serde_json::json!({"coins": 2})))],
            })
            .unwrap();
        assert_eq!(store.fetch(&user).unwrap().unwrap().version, 2);

        // Stale expectation: neither document may be written
        let result = store.commit(CommitBatch {
            expected: vec![(user.clone(), Some(1))],
            writes: vec![
                (habit.clone(), Write::Put(serde_json::json!({"done": true}))),
                (user.clone(), Write::Put(serde_json::json!({"coins": 3}))),
            ],
        });
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert!(store.fetch(&habit).unwrap().is_none());
        assert_eq!(store.fetch(&user).unwrap().unwrap().body["coins"], 2);
        assert_eq!(store.count(Collection::Users).unwrap(), 1);
    }
}
