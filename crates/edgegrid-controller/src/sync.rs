//! Store-sync protocol — typed, deadline-bounded access to the object store.
//!
//! Objects are JSON-encoded under `<TypePrefix>/<key-string>`. Every call
//! carries a deadline; a breach surfaces as [`StoreError::Timeout`]. There
//! is no retry here.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use edgegrid_core::config::StoreConfig;
use edgegrid_core::{Object, load_prefix, store_key};
use edgegrid_state::{ObjStore, StoreError, StoreResult};
use tokio::time::Instant;
use tracing::warn;

use crate::error::ControllerResult;

#[derive(Clone)]
pub struct StoreSync {
    store: Arc<dyn ObjStore>,
    timeout: Duration,
    init_timeout: Duration,
    scan_page: usize,
}

impl StoreSync {
    pub fn new(store: Arc<dyn ObjStore>, config: &StoreConfig) -> Self {
        Self {
            store,
            timeout: config.timeout(),
            init_timeout: config.init_timeout(),
            scan_page: config.scan_page.max(1),
        }
    }

    async fn deadline<R>(
        limit: Duration,
        call: impl Future<Output = StoreResult<R>>,
    ) -> StoreResult<R> {
        tokio::time::timeout(limit, call)
            .await
            .map_err(|_| StoreError::Timeout(limit))?
    }

    /// Scan the whole namespace of `T` page by page, handing every
    /// decodable object to `visit` as soon as its page arrives. Undecodable
    /// entries are skipped. Returns the number visited.
    ///
    /// The scan deadline covers all pages together. On a breach the objects
    /// already visited stay visited and `StoreError::Timeout` is returned.
    pub async fn load_all<T: Object>(&self, mut visit: impl FnMut(T)) -> ControllerResult<usize> {
        let prefix = load_prefix(T::TYPE);
        let deadline = Instant::now() + self.init_timeout;
        let mut after: Option<String> = None;
        let mut loaded = 0;
        loop {
            let page = tokio::time::timeout_at(
                deadline,
                self.store.list(&prefix, after.as_deref(), self.scan_page),
            )
            .await
            .map_err(|_| StoreError::Timeout(self.init_timeout))??;
            let full = page.len() >= self.scan_page;
            for (key, value) in page {
                match serde_json::from_slice::<T>(&value) {
                    Ok(obj) => {
                        visit(obj);
                        loaded += 1;
                    }
                    Err(e) => warn!(%key, error = %e, "skipping undecodable object"),
                }
                after = Some(key);
            }
            if !full {
                return Ok(loaded);
            }
        }
    }

    /// Read one object. A missing key is reported as `StoreError::KeyNotFound`.
    pub async fn load_one<T: Object>(&self, key: &T::Key) -> ControllerResult<T> {
        let value = Self::deadline(self.timeout, self.store.get(&store_key::<T>(key))).await?;
        Ok(serde_json::from_slice(&value)?)
    }

    pub async fn create<T: Object>(&self, obj: &T) -> ControllerResult<()> {
        let value = serde_json::to_vec(obj)?;
        let key = store_key::<T>(obj.key());
        Self::deadline(self.timeout, self.store.create(&key, value)).await?;
        Ok(())
    }

    pub async fn update<T: Object>(&self, obj: &T) -> ControllerResult<()> {
        let value = serde_json::to_vec(obj)?;
        let key = store_key::<T>(obj.key());
        Self::deadline(self.timeout, self.store.update(&key, value)).await?;
        Ok(())
    }

    pub async fn delete<T: Object>(&self, key: &T::Key) -> ControllerResult<()> {
        Self::deadline(self.timeout, self.store.delete(&store_key::<T>(key))).await?;
        Ok(())
    }
}
