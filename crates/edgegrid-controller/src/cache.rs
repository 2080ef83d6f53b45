//! ObjApi — the in-memory authoritative mirror of one entity type.
//!
//! Each `ObjApi` owns a map from key to object behind a single lock and
//! mediates every read and write of its type:
//!
//! - Mutations validate first, write the store outside the lock, then
//!   reconcile the map through [`ObjApi::refresh`], the one place where
//!   "does this key exist" is decided.
//! - `refresh` holds the write lock across its store read and map update,
//!   and always publishes a downstream notice before releasing it.
//! - `show`, `get` and validators take the read lock. A long `show` still
//!   blocks refreshes and mutations of this type for its duration.
//!
//! Different entity types have independent locks.

use std::collections::{HashMap, HashSet};

use edgegrid_core::{ObjKey, Object, OpResult, store_key};
use edgegrid_notify::Publisher;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{ControllerError, ControllerResult, ValidationError};
use crate::sync::StoreSync;
use crate::validate::Validator;

/// Outbound notification handles of a controller.
#[derive(Clone, Debug)]
pub struct Notifiers {
    /// Peer replicas; published after each confirmed local mutation.
    pub peers: Publisher,
    /// Downstream consumers; published by every refresh.
    pub downstream: Publisher,
}

pub struct ObjApi<T: Object, V: Validator<T>> {
    objs: RwLock<HashMap<T::Key, T>>,
    sync: StoreSync,
    rules: V,
    notify: Notifiers,
}

impl<T: Object, V: Validator<T>> ObjApi<T, V> {
    /// Build the controller and bulk-load every stored object of `T`.
    ///
    /// A scan that exceeds its deadline is tolerated: the controller starts
    /// with whatever it has. Any other load error fails initialization.
    pub async fn init(sync: StoreSync, rules: V, notify: Notifiers) -> ControllerResult<Self> {
        let api = Self {
            objs: RwLock::new(HashMap::new()),
            sync,
            rules,
            notify,
        };

        {
            let mut objs = api.objs.write().await;
            let loaded = api
                .sync
                .load_all::<T>(|obj| {
                    objs.insert(obj.key().clone(), obj);
                })
                .await;
            match loaded {
                Ok(count) => info!(obj_type = %T::TYPE, count, "cache loaded"),
                Err(ControllerError::Store(e)) if e.is_timeout() => {
                    warn!(
                        obj_type = %T::TYPE,
                        error = %e,
                        count = objs.len(),
                        "cache load timed out, starting with partial data"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(api)
    }

    // ── Validation ────────────────────────────────────────────────

    pub async fn validate_key(&self, key: &T::Key) -> Result<(), ValidationError> {
        if key.is_unset() {
            return Err(ValidationError::KeyNotSpecified(T::TYPE));
        }
        self.rules.validate_key(key).await
    }

    pub async fn validate(&self, obj: &T) -> Result<(), ValidationError> {
        self.validate_key(obj.key()).await?;
        self.rules.validate_fields(obj).await
    }

    /// Validate `key` as a reference from a child entity: it must be valid
    /// and currently cached.
    pub async fn validate_ref(&self, key: &T::Key) -> Result<(), ValidationError> {
        self.validate_key(key).await?;
        if !self.contains(key).await {
            return Err(ValidationError::NotFound {
                kind: T::TYPE,
                key: key.key_string(),
            });
        }
        Ok(())
    }

    // ── Mutations ─────────────────────────────────────────────────

    /// Create a new object. Fails if the key already exists in the store.
    pub async fn create(&self, mut obj: T) -> ControllerResult<OpResult> {
        self.validate(&obj).await?;
        self.rules.prepare_create(&mut obj).await;
        self.sync.create(&obj).await?;
        self.confirmed(obj.key(), "created").await
    }

    /// Replace an existing object. Fails if the key is not in the store.
    pub async fn update(&self, obj: T) -> ControllerResult<OpResult> {
        self.validate(&obj).await?;
        self.sync.update(&obj).await?;
        self.confirmed(obj.key(), "updated").await
    }

    /// Remove an existing object. Only the presence of the key is checked,
    /// so objects whose parents are already gone can still be deleted.
    pub async fn delete(&self, obj: T) -> ControllerResult<OpResult> {
        if obj.key().is_unset() {
            return Err(ValidationError::KeyNotSpecified(T::TYPE).into());
        }
        self.sync.delete::<T>(obj.key()).await?;
        self.confirmed(obj.key(), "deleted").await
    }

    /// After a store-confirmed write: reconcile locally, then tell peers.
    ///
    /// The write has already happened, so a failed follow-up read does not
    /// fail the mutation. The cache catches up on the next refresh of the
    /// key or the next resync.
    async fn confirmed(&self, key: &T::Key, action: &str) -> ControllerResult<OpResult> {
        if let Err(e) = self.refresh(key).await {
            warn!(
                obj_type = %T::TYPE,
                key = %store_key::<T>(key),
                error = %e,
                "refresh after mutation failed, cache is stale"
            );
        }
        self.notify.peers.publish(T::TYPE, key);
        info!(obj_type = %T::TYPE, key = %store_key::<T>(key), action, "mutation confirmed");
        Ok(OpResult::new(action))
    }

    // ── Store sync ────────────────────────────────────────────────

    /// Re-read one key from the store and reconcile the cache.
    ///
    /// A key the store no longer has is removed from the cache and counts
    /// as success. A downstream notice is published on every return path,
    /// even when nothing changed.
    pub async fn refresh(&self, key: &T::Key) -> ControllerResult<()> {
        let mut objs = self.objs.write().await;
        let result = match self.sync.load_one::<T>(key).await {
            Ok(obj) => {
                objs.insert(key.clone(), obj);
                debug!(obj_type = %T::TYPE, key = %store_key::<T>(key), "refreshed");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                if objs.remove(key).is_some() {
                    debug!(obj_type = %T::TYPE, key = %store_key::<T>(key), "removed on refresh");
                }
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.notify.downstream.publish(T::TYPE, key);
        result
    }

    /// Replace the whole cache with a fresh scan of the store.
    ///
    /// Used when notices may have been lost. Unlike `init`, a deadline
    /// breach leaves the current cache untouched and is returned.
    pub async fn resync(&self) -> ControllerResult<usize> {
        let mut objs = self.objs.write().await;
        let mut fresh = HashMap::new();
        let count = self
            .sync
            .load_all::<T>(|obj| {
                fresh.insert(obj.key().clone(), obj);
            })
            .await?;
        *objs = fresh;
        info!(obj_type = %T::TYPE, count, "cache resynced");
        Ok(count)
    }

    // ── Reads ─────────────────────────────────────────────────────

    /// Snapshot of every cached key.
    pub async fn get_all_keys(&self) -> HashSet<T::Key> {
        let objs = self.objs.read().await;
        objs.keys().cloned().collect()
    }

    /// Copy of the cached object for `key`.
    pub async fn get(&self, key: &T::Key) -> Option<T> {
        let objs = self.objs.read().await;
        objs.get(key).cloned()
    }

    pub async fn contains(&self, key: &T::Key) -> bool {
        let objs = self.objs.read().await;
        objs.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.objs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objs.read().await.is_empty()
    }

    /// Stream every cached object matching `filter` into `emit`.
    ///
    /// Iteration stops at the first error from `emit`, which is returned.
    pub async fn show<F, E>(&self, filter: &T, mut emit: F) -> Result<(), E>
    where
        F: FnMut(&T) -> Result<(), E>,
    {
        let objs = self.objs.read().await;
        for obj in objs.values().filter(|obj| obj.matches(filter)) {
            emit(obj)?;
        }
        Ok(())
    }
}
