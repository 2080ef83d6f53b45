//! Receive loop that turns inbound notices into handler calls.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bus::Notice;
use crate::error::NotifyResult;

/// Consumer of inbound notices.
#[async_trait]
pub trait NoticeHandler: Send + Sync + 'static {
    /// Reconcile the single key named by `notice`.
    async fn on_notify(&self, notice: &Notice) -> NotifyResult<()>;

    /// Reconcile everything. Called when the receiver fell behind and
    /// notices were lost.
    async fn resync(&self) -> NotifyResult<()>;
}

/// Spawn the receive loop for one subscription.
///
/// Notices whose origin is `local_origin` are skipped: the local replica
/// already applied them. Handler errors are logged and do not stop the
/// loop. The task ends when `shutdown` flips or the bus closes.
pub fn spawn_listener<H: NoticeHandler>(
    mut rx: broadcast::Receiver<Notice>,
    local_origin: String,
    handler: Arc<H>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(origin = %local_origin, "notice listener started");
        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Ok(notice) => {
                        if notice.origin == local_origin {
                            continue;
                        }
                        debug!(obj_type = %notice.obj_type, from = %notice.origin, "notice received");
                        if let Err(e) = handler.on_notify(&notice).await {
                            warn!(obj_type = %notice.obj_type, error = %e, "notice handling failed");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "notice listener lagged, resyncing");
                        if let Err(e) = handler.resync().await {
                            warn!(error = %e, "resync failed");
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = shutdown.changed() => break,
            }
        }
        info!(origin = %local_origin, "notice listener stopped");
    })
}
