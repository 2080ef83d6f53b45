//! Fixtures shared by the controller tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use edgegrid_core::config::StoreConfig;
use edgegrid_core::*;
use edgegrid_notify::NotifyBus;
use edgegrid_state::{ObjStore, RedbObjStore, StoreError, StoreResult};

use crate::cache::Notifiers;
use crate::controller::Controller;

/// In-memory redb store that counts calls and can misbehave on `list` and
/// `get`.
pub struct StubStore {
    inner: RedbObjStore,
    calls: AtomicUsize,
    list_delay: Option<Duration>,
    fail_list: bool,
    fail_get: AtomicBool,
}

impl StubStore {
    pub fn new() -> Self {
        Self {
            inner: RedbObjStore::open_in_memory().unwrap(),
            calls: AtomicUsize::new(0),
            list_delay: None,
            fail_list: false,
            fail_get: AtomicBool::new(false),
        }
    }

    pub fn with_slow_list(inner: RedbObjStore, delay: Duration) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            list_delay: Some(delay),
            fail_list: false,
            fail_get: AtomicBool::new(false),
        }
    }

    pub fn with_failing_list() -> Self {
        Self {
            fail_list: true,
            ..Self::new()
        }
    }

    /// Make every following `get` fail with a read error, or stop failing.
    pub fn fail_gets(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The backing store, for out-of-band writes that bypass the controller.
    pub fn raw(&self) -> &RedbObjStore {
        &self.inner
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjStore for StubStore {
    async fn create(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.count();
        self.inner.create(key, value).await
    }

    async fn update(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.count();
        self.inner.update(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.count();
        self.inner.delete(key).await
    }

    async fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.count();
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(StoreError::Read("blip".to_string()));
        }
        self.inner.get(key).await
    }

    async fn list(
        &self,
        prefix: &str,
        after: Option<&str>,
        limit: usize,
    ) -> StoreResult<Vec<(String, Vec<u8>)>> {
        self.count();
        if self.fail_list {
            return Err(StoreError::Read("disk on fire".to_string()));
        }
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.list(prefix, after, limit).await
    }
}

pub fn test_config() -> StoreConfig {
    StoreConfig {
        timeout_ms: 1_000,
        init_timeout_ms: 100,
        ..StoreConfig::default()
    }
}

pub fn notifiers(origin: &str, peers: &NotifyBus, downstream: &NotifyBus) -> Notifiers {
    Notifiers {
        peers: peers.publisher(origin),
        downstream: downstream.publisher(origin),
    }
}

// ── Objects ───────────────────────────────────────────────────────

pub fn acme() -> Developer {
    Developer {
        key: DeveloperKey {
            name: "acme".to_string(),
        },
        email: "ops@acme.example".to_string(),
        ..Default::default()
    }
}

pub fn op_a() -> Operator {
    Operator {
        key: OperatorKey {
            name: "opA".to_string(),
        },
    }
}

pub fn site(name: &str, latitude: f64) -> Cloudlet {
    Cloudlet {
        key: CloudletKey {
            operator_key: op_a().key,
            name: name.to_string(),
        },
        access_ip: "192.168.1.1".to_string(),
        location: Loc {
            latitude,
            longitude: -122.0,
            ..Default::default()
        },
    }
}

pub fn video() -> App {
    App {
        key: AppKey {
            developer_key: acme().key,
            name: "video".to_string(),
            version: "1.0".to_string(),
        },
        image_type: ImageType::Docker,
        image_path: "registry.example/acme/video:1.0".to_string(),
        access_layer: AccessLayer::L7,
    }
}

pub fn video_inst(site_name: &str, id: u64) -> AppInst {
    AppInst {
        key: AppInstKey {
            app_key: video().key,
            cloudlet_key: site(site_name, 0.0).key,
            id,
        },
        liveness: Liveness::Static,
        ip: "10.0.0.5".to_string(),
        ..Default::default()
    }
}

// ── Harness ───────────────────────────────────────────────────────

pub struct Harness {
    pub ctrl: Controller,
    pub store: Arc<StubStore>,
    pub peers: NotifyBus,
    pub downstream: NotifyBus,
}

/// Controller over a fresh store holding developer `acme`, operator `opA`,
/// cloudlets `site1` (latitude 37.0) and `site2` (latitude 40.0), and app
/// `video` 1.0.
pub async fn harness() -> Harness {
    let store = Arc::new(StubStore::new());
    let peers = NotifyBus::new(64);
    let downstream = NotifyBus::new(64);
    let ctrl = Controller::init(
        store.clone(),
        &test_config(),
        notifiers("ctrl-a", &peers, &downstream),
    )
    .await
    .unwrap();

    ctrl.developers.create(acme()).await.unwrap();
    ctrl.operators.create(op_a()).await.unwrap();
    ctrl.cloudlets.create(site("site1", 37.0)).await.unwrap();
    ctrl.cloudlets.create(site("site2", 40.0)).await.unwrap();
    ctrl.apps.create(video()).await.unwrap();

    Harness {
        ctrl,
        store,
        peers,
        downstream,
    }
}
