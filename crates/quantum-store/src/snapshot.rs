//! # Snapshot Persistence
//!
//! Whole-container JSON snapshots in a local SQLite file.
//!
//! ## Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     snapshots table                                     │
//! │                                                                         │
//! │  namespace (PK)              │ payload (JSON)          │ updated_at    │
//! │  ────────────────────────────┼─────────────────────────┼────────────   │
//! │  quantum_erp_vendors         │ {"records":[...],...}   │ 2026-...      │
//! │  quantum_erp_customers       │ {"records":[...],...}   │ 2026-...      │
//! │  quantum_erp_order_tracking  │ {"records":[...],...}   │ 2026-...      │
//! │  quantum_erp_commission      │ {"records":[...],...}   │ 2026-...      │
//! │  ...                         │                         │               │
//! │                                                                         │
//! │  Load whole container at startup, save whole container after every     │
//! │  mutation. One row per store; stores never read each other's rows.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The payload shape is deliberately treated as opaque: there is no
//! schema version and no migration machinery, matching the
//! load-everything/save-everything lifecycle of the stores.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::error::{StoreError, StoreResult};

/// Handle to the snapshot database, shared by all stores.
pub struct Snapshot {
    conn: Mutex<Connection>,
}

impl Snapshot {
    /// Opens (or creates) the snapshot database at `path`.
    ///
    /// Creates the parent directory if needed.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Arc<Self>> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        configure(&conn)?;
        info!("snapshot database opened at {}", path.display());

        Ok(Arc::new(Snapshot {
            conn: Mutex::new(conn),
        }))
    }

    /// Opens an isolated in-memory snapshot (tests).
    pub fn in_memory() -> StoreResult<Arc<Self>> {
        let conn = Connection::open_in_memory()?;
        configure(&conn)?;
        Ok(Arc::new(Snapshot {
            conn: Mutex::new(conn),
        }))
    }

    /// Loads a namespace's container, or `None` if it was never saved.
    pub fn load<T: DeserializeOwned>(&self, namespace: &str) -> StoreResult<Option<T>> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM snapshots WHERE namespace = ?1",
                params![namespace],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Writes a namespace's whole container, replacing any previous row.
    pub fn save<T: Serialize>(&self, namespace: &str, value: &T) -> StoreResult<()> {
        let payload = serde_json::to_string(value)?;
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT OR REPLACE INTO snapshots (namespace, payload, updated_at)
             VALUES (?1, ?2, datetime('now'))",
            params![namespace, payload],
        )?;
        Ok(())
    }
}

/// Applies pragmas and ensures the snapshots table exists.
fn configure(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;
         CREATE TABLE IF NOT EXISTS snapshots (
             namespace  TEXT PRIMARY KEY,
             payload    TEXT NOT NULL,
             updated_at TEXT NOT NULL
         );",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        names: Vec<String>,
        counter: u64,
    }

    #[test]
    fn test_round_trip() {
        let snapshot = Snapshot::in_memory().unwrap();
        assert!(snapshot.load::<Payload>("ns").unwrap().is_none());

        let value = Payload {
            names: vec!["a".to_string(), "b".to_string()],
            counter: 7,
        };
        snapshot.save("ns", &value).unwrap();
        assert_eq!(snapshot.load::<Payload>("ns").unwrap(), Some(value));
    }

    #[test]
    fn test_namespaces_are_independent() {
        let snapshot = Snapshot::in_memory().unwrap();
        let a = Payload {
            names: vec!["a".to_string()],
            counter: 1,
        };
        let b = Payload {
            names: vec!["b".to_string()],
            counter: 2,
        };
        snapshot.save("ns_a", &a).unwrap();
        snapshot.save("ns_b", &b).unwrap();

        assert_eq!(snapshot.load::<Payload>("ns_a").unwrap(), Some(a));
        assert_eq!(snapshot.load::<Payload>("ns_b").unwrap(), Some(b));
    }

    #[test]
    fn test_save_replaces() {
        let snapshot = Snapshot::in_memory().unwrap();
        let first = Payload {
            names: vec![],
            counter: 1,
        };
        let second = Payload {
            names: vec!["x".to_string()],
            counter: 2,
        };
        snapshot.save("ns", &first).unwrap();
        snapshot.save("ns", &second).unwrap();
        assert_eq!(snapshot.load::<Payload>("ns").unwrap(), Some(second));
    }
}
