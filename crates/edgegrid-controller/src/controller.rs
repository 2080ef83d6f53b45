//! Controller — one cache per entity type, wired in dependency order.

use std::sync::Arc;

use async_trait::async_trait;
use edgegrid_core::ObjType;
use edgegrid_core::config::StoreConfig;
use edgegrid_notify::{Notice, NoticeHandler, NotifyError, NotifyResult};
use edgegrid_state::ObjStore;
use tracing::info;

use crate::apis::*;
use crate::cache::Notifiers;
use crate::error::ControllerResult;
use crate::sync::StoreSync;

/// The full set of entity caches of one controller replica.
pub struct Controller {
    pub developers: Arc<DeveloperApi>,
    pub operators: Arc<OperatorApi>,
    pub cloudlets: Arc<CloudletApi>,
    pub apps: Arc<AppApi>,
    pub app_insts: Arc<AppInstApi>,
}

impl Controller {
    /// Build every cache, parents before children, bulk-loading each from
    /// the store.
    pub async fn init(
        store: Arc<dyn ObjStore>,
        config: &StoreConfig,
        notify: Notifiers,
    ) -> ControllerResult<Self> {
        let sync = StoreSync::new(store, config);

        let developers =
            Arc::new(DeveloperApi::init(sync.clone(), DeveloperRules, notify.clone()).await?);
        let operators =
            Arc::new(OperatorApi::init(sync.clone(), OperatorRules, notify.clone()).await?);
        let cloudlets = Arc::new(
            CloudletApi::init(
                sync.clone(),
                CloudletRules::new(Arc::clone(&operators)),
                notify.clone(),
            )
            .await?,
        );
        let apps = Arc::new(
            AppApi::init(
                sync.clone(),
                AppRules::new(Arc::clone(&developers)),
                notify.clone(),
            )
            .await?,
        );
        let app_insts = Arc::new(
            AppInstApi::init(
                sync,
                AppInstRules::new(Arc::clone(&apps), Arc::clone(&cloudlets)),
                notify,
            )
            .await?,
        );

        info!("controller initialized");
        Ok(Self {
            developers,
            operators,
            cloudlets,
            apps,
            app_insts,
        })
    }

    /// Reconcile the key named by a peer notice.
    pub async fn handle_notice(&self, notice: &Notice) -> ControllerResult<()> {
        match notice.obj_type {
            ObjType::Developer => self.developers.refresh(&notice.decode_key()?).await,
            ObjType::Operator => self.operators.refresh(&notice.decode_key()?).await,
            ObjType::Cloudlet => self.cloudlets.refresh(&notice.decode_key()?).await,
            ObjType::App => self.apps.refresh(&notice.decode_key()?).await,
            ObjType::AppInst => self.app_insts.refresh(&notice.decode_key()?).await,
        }
    }

    /// Reload every cache from the store, parents first.
    pub async fn resync(&self) -> ControllerResult<()> {
        self.developers.resync().await?;
        self.operators.resync().await?;
        self.cloudlets.resync().await?;
        self.apps.resync().await?;
        self.app_insts.resync().await?;
        Ok(())
    }
}

#[async_trait]
impl NoticeHandler for Controller {
    async fn on_notify(&self, notice: &Notice) -> NotifyResult<()> {
        self.handle_notice(notice)
            .await
            .map_err(|e| NotifyError::Handler(e.to_string()))
    }

    async fn resync(&self) -> NotifyResult<()> {
        Controller::resync(self)
            .await
            .map_err(|e| NotifyError::Handler(e.to_string()))
    }
}
