//! Broadcast topic and publisher handles.

use edgegrid_core::ObjType;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// "This key changed" — carries no payload beyond the key itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    /// Replica that published the notice.
    pub origin: String,
    pub obj_type: ObjType,
    /// The typed composite key, JSON-encoded.
    pub key: serde_json::Value,
}

impl Notice {
    /// Decode the key as `K`.
    pub fn decode_key<K: serde::de::DeserializeOwned>(&self) -> Result<K, serde_json::Error> {
        serde_json::from_value(self.key.clone())
    }
}

/// One broadcast topic shared by every publisher and subscriber.
#[derive(Clone, Debug)]
pub struct NotifyBus {
    sender: broadcast::Sender<Notice>,
}

impl NotifyBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publisher that stamps its notices with `origin`.
    pub fn publisher(&self, origin: impl Into<String>) -> Publisher {
        Publisher {
            origin: origin.into(),
            sender: self.sender.clone(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }
}

/// Fire-and-forget sending half of a [`NotifyBus`].
#[derive(Clone, Debug)]
pub struct Publisher {
    origin: String,
    sender: broadcast::Sender<Notice>,
}

impl Publisher {
    /// Announce that `key` of `obj_type` changed. Never fails: a topic with
    /// no subscribers simply drops the notice.
    pub fn publish<K: Serialize>(&self, obj_type: ObjType, key: &K) {
        let key = match serde_json::to_value(key) {
            Ok(v) => v,
            Err(e) => {
                warn!(%obj_type, error = %e, "dropping notice with unencodable key");
                return;
            }
        };
        let notice = Notice {
            origin: self.origin.clone(),
            obj_type,
            key,
        };
        if self.sender.send(notice).is_err() {
            trace!(%obj_type, "notice dropped, no subscribers");
        }
    }
}
