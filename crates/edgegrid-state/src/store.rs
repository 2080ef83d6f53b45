//! ObjStore — the durable key/value contract and its redb backend.
//!
//! redb transactions are synchronous, so every call of [`RedbObjStore`]
//! runs on the blocking pool. That keeps the async callers free to put a
//! deadline on the call with `tokio::time::timeout`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::tables::OBJECTS;

/// Convert any `Display` error into a `StoreError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StoreError::$variant(e.to_string())
    };
}

/// Durable, cluster-wide object storage keyed by opaque strings.
///
/// Implementations must report the distinguished conditions exactly:
/// - `create` fails with [`StoreError::KeyExists`] if the key is present.
/// - `update` and `delete` fail with [`StoreError::KeyNotFound`] if absent.
/// - `get` fails with [`StoreError::KeyNotFound`] if absent.
#[async_trait]
pub trait ObjStore: Send + Sync {
    /// Write a new key. Never overwrites.
    async fn create(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Replace the value of an existing key.
    async fn update(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Remove an existing key.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Read one key.
    async fn get(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// Up to `limit` `(key, value)` pairs whose key starts with `prefix`, in
    /// key order, beginning strictly after `after` when given.
    async fn list(
        &self,
        prefix: &str,
        after: Option<&str>,
        limit: usize,
    ) -> StoreResult<Vec<(String, Vec<u8>)>>;
}

/// Thread-safe object store backed by redb.
#[derive(Clone)]
pub struct RedbObjStore {
    db: Arc<Database>,
}

impl RedbObjStore {
    /// Open (or create) a persistent object store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "object store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory object store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory object store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(OBJECTS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Run a synchronous redb operation on the blocking pool.
    async fn blocking<F, R>(&self, op: F) -> StoreResult<R>
    where
        F: FnOnce(&Database) -> StoreResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(map_err!(Task))?
    }
}

/// Insert `key`, requiring it to be present (`must_exist`) or absent.
fn write_checked(db: &Database, key: &str, value: &[u8], must_exist: bool) -> StoreResult<()> {
    let txn = db.begin_write().map_err(map_err!(Transaction))?;
    {
        let mut table = txn.open_table(OBJECTS).map_err(map_err!(Table))?;
        let exists = table.get(key).map_err(map_err!(Read))?.is_some();
        match (must_exist, exists) {
            (false, true) => return Err(StoreError::KeyExists(key.to_string())),
            (true, false) => return Err(StoreError::KeyNotFound(key.to_string())),
            _ => {}
        }
        table.insert(key, value).map_err(map_err!(Write))?;
    }
    txn.commit().map_err(map_err!(Transaction))?;
    Ok(())
}

#[async_trait]
impl ObjStore for RedbObjStore {
    async fn create(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let key = key.to_string();
        self.blocking(move |db| {
            write_checked(db, &key, &value, false)?;
            debug!(%key, "object created");
            Ok(())
        })
        .await
    }

    async fn update(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let key = key.to_string();
        self.blocking(move |db| {
            write_checked(db, &key, &value, true)?;
            debug!(%key, "object updated");
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let key = key.to_string();
        self.blocking(move |db| {
            let txn = db.begin_write().map_err(map_err!(Transaction))?;
            let existed;
            {
                let mut table = txn.open_table(OBJECTS).map_err(map_err!(Table))?;
                existed = table.remove(key.as_str()).map_err(map_err!(Write))?.is_some();
            }
            if !existed {
                txn.abort().map_err(map_err!(Transaction))?;
                return Err(StoreError::KeyNotFound(key));
            }
            txn.commit().map_err(map_err!(Transaction))?;
            debug!(%key, "object deleted");
            Ok(())
        })
        .await
    }

    async fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let key = key.to_string();
        self.blocking(move |db| {
            let txn = db.begin_read().map_err(map_err!(Transaction))?;
            let table = txn.open_table(OBJECTS).map_err(map_err!(Table))?;
            match table.get(key.as_str()).map_err(map_err!(Read))? {
                Some(guard) => Ok(guard.value().to_vec()),
                None => Err(StoreError::KeyNotFound(key)),
            }
        })
        .await
    }

    async fn list(
        &self,
        prefix: &str,
        after: Option<&str>,
        limit: usize,
    ) -> StoreResult<Vec<(String, Vec<u8>)>> {
        let prefix = prefix.to_string();
        let after = after.map(str::to_string);
        self.blocking(move |db| {
            let txn = db.begin_read().map_err(map_err!(Transaction))?;
            let table = txn.open_table(OBJECTS).map_err(map_err!(Table))?;
            let start = after.as_deref().unwrap_or(prefix.as_str());
            let mut results = Vec::new();
            for entry in table.range(start..).map_err(map_err!(Read))? {
                if results.len() >= limit {
                    break;
                }
                let (key, value) = entry.map_err(map_err!(Read))?;
                let key = key.value();
                if after.as_deref() == Some(key) {
                    continue;
                }
                if !key.starts_with(&prefix) {
                    break;
                }
                results.push((key.to_string(), value.value().to_vec()));
            }
            Ok(results)
        })
        .await
    }
}
