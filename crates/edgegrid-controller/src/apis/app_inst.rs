//! Application instances — the most constrained entity.
//!
//! An instance references both an app and the cloudlet hosting it, and
//! carries a copy of that cloudlet's location taken at creation time. The
//! copy is never refreshed: later cloudlet updates do not reach instances
//! that already exist.

use std::sync::Arc;

use async_trait::async_trait;
use edgegrid_core::{AppInst, AppInstKey, Liveness, ObjType, valid_ip};
use tracing::debug;

use crate::apis::{AppApi, CloudletApi};
use crate::cache::ObjApi;
use crate::error::ValidationError;
use crate::validate::Validator;

pub type AppInstApi = ObjApi<AppInst, AppInstRules>;

pub struct AppInstRules {
    apps: Arc<AppApi>,
    cloudlets: Arc<CloudletApi>,
}

impl AppInstRules {
    pub fn new(apps: Arc<AppApi>, cloudlets: Arc<CloudletApi>) -> Self {
        Self { apps, cloudlets }
    }
}

#[async_trait]
impl Validator<AppInst> for AppInstRules {
    async fn validate_key(&self, key: &AppInstKey) -> Result<(), ValidationError> {
        if key.id == 0 {
            return Err(ValidationError::ZeroId(ObjType::AppInst));
        }
        self.apps.validate_ref(&key.app_key).await?;
        self.cloudlets.validate_ref(&key.cloudlet_key).await
    }

    async fn validate_fields(&self, obj: &AppInst) -> Result<(), ValidationError> {
        if obj.liveness == Liveness::Unknown {
            return Err(ValidationError::UnknownLiveness);
        }
        if !valid_ip(&obj.ip) {
            return Err(ValidationError::InvalidIp(obj.ip.clone()));
        }
        Ok(())
    }

    async fn prepare_create(&self, obj: &mut AppInst) {
        if let Some(cloudlet) = self.cloudlets.get(&obj.key.cloudlet_key).await {
            debug!(cloudlet = %cloudlet.key.name, "caching cloudlet location in app inst");
            obj.cloudlet_loc = cloudlet.location;
        }
    }
}

#[cfg(test)]
mod tests {
    use edgegrid_core::*;

    use crate::error::{ControllerError, ValidationError};
    use crate::testutil::*;

    fn invalid(err: ControllerError) -> ValidationError {
        match err {
            ControllerError::Invalid(v) => v,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_id_is_rejected_without_store_call() {
        let h = harness().await;
        let calls = h.store.calls();

        let err = h.ctrl.app_insts.validate_key(&video_inst("site1", 0).key).await;
        assert_eq!(err, Err(ValidationError::ZeroId(ObjType::AppInst)));

        let err = h.ctrl.app_insts.create(video_inst("site1", 0)).await.unwrap_err();
        assert_eq!(invalid(err), ValidationError::ZeroId(ObjType::AppInst));
        assert_eq!(h.store.calls(), calls);
    }

    #[tokio::test]
    async fn unknown_cloudlet_is_rejected() {
        let h = harness().await;
        let inst = video_inst("site9", 1);

        let err = h.ctrl.app_insts.validate_key(&inst.key).await.unwrap_err();

        assert_eq!(
            err,
            ValidationError::NotFound {
                kind: ObjType::Cloudlet,
                key: "opA/site9".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn unknown_app_is_rejected() {
        let h = harness().await;
        let mut inst = video_inst("site1", 1);
        inst.key.app_key.version = "2.0".to_string();

        let err = h.ctrl.app_insts.create(inst).await.unwrap_err();

        assert!(matches!(
            invalid(err),
            ValidationError::NotFound { kind: ObjType::App, .. }
        ));
    }

    #[tokio::test]
    async fn parent_chain_reaches_grandparents() {
        let h = harness().await;
        let mut inst = video_inst("site1", 1);
        inst.key.cloudlet_key.operator_key.name = "opZ".to_string();

        let err = h.ctrl.app_insts.validate_key(&inst.key).await.unwrap_err();

        assert_eq!(
            err,
            ValidationError::NotFound {
                kind: ObjType::Operator,
                key: "opZ".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn missing_key_is_rejected() {
        let h = harness().await;
        let err = h.ctrl.app_insts.validate(&AppInst::default()).await;
        assert_eq!(err, Err(ValidationError::KeyNotSpecified(ObjType::AppInst)));
    }

    #[tokio::test]
    async fn unknown_liveness_is_rejected() {
        let h = harness().await;
        let inst = AppInst {
            liveness: Liveness::Unknown,
            ..video_inst("site1", 1)
        };

        let err = h.ctrl.app_insts.create(inst).await.unwrap_err();
        assert_eq!(invalid(err), ValidationError::UnknownLiveness);
    }

    #[tokio::test]
    async fn malformed_ip_is_rejected() {
        let h = harness().await;
        for ip in ["", "10.0.0", "not-an-ip"] {
            let inst = AppInst {
                ip: ip.to_string(),
                ..video_inst("site1", 1)
            };
            let err = h.ctrl.app_insts.create(inst).await.unwrap_err();
            assert_eq!(invalid(err), ValidationError::InvalidIp(ip.to_string()));
        }
        assert!(h.ctrl.app_insts.is_empty().await);
    }

    #[tokio::test]
    async fn location_snapshot_is_not_refreshed() {
        let h = harness().await;
        let inst = video_inst("site1", 7);
        assert_eq!(store_key::<AppInst>(&inst.key), "AppInst/acme/video/1.0/opA/site1/7");

        h.ctrl.app_insts.create(inst.clone()).await.unwrap();
        h.ctrl.cloudlets.update(site("site1", 51.5)).await.unwrap();

        let moved = h.ctrl.cloudlets.get(&inst.key.cloudlet_key).await.unwrap();
        assert_eq!(moved.location.latitude, 51.5);
        let got = h.ctrl.app_insts.get(&inst.key).await.unwrap();
        assert_eq!(got.cloudlet_loc, site("site1", 37.0).location);
    }

    #[tokio::test]
    async fn update_keeps_caller_supplied_location() {
        let h = harness().await;
        let inst = video_inst("site1", 8);
        h.ctrl.app_insts.create(inst.clone()).await.unwrap();

        h.ctrl.app_insts.update(inst.clone()).await.unwrap();

        let got = h.ctrl.app_insts.get(&inst.key).await.unwrap();
        assert_eq!(got.cloudlet_loc, Loc::default());
    }
}
