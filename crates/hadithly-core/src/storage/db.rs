//! Shared database handle
//!
//! A `Database` is a cloneable handle to one SQLite connection, shared by
//! the item store, the folder store, and the snapshot codec. All access
//! goes through a single lock: at most one mutation is in flight per
//! database, and each mutation commits (or rolls back) as one transaction
//! before the next is applied.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Transaction};
use tracing::debug;

use crate::config::Config;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema::{init_schema, needs_init};

/// Cloneable handle to the durable store
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the configured path
    pub fn open(config: &Config) -> StorageResult<Self> {
        let path = config.sqlite_path();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::create_dir(parent, e))?;
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        if needs_init(&conn) {
            debug!(path = %path.display(), "initializing database schema");
            init_schema(&conn)?;
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a read-only closure against the connection
    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let conn = self.lock();
        f(&conn)
    }

    /// Run a closure inside a transaction
    ///
    /// Commits if the closure returns `Ok`; any error drops the transaction,
    /// which rolls back every statement it ran.
    pub(crate) fn with_tx<T>(
        &self,
        f: impl FnOnce(&Transaction) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Acquire the connection lock
    ///
    /// A poisoned lock means another thread panicked mid-operation; its
    /// uncommitted transaction has already rolled back, so the connection
    /// itself is still consistent.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}
