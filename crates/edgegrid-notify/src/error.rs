//! Notification error types.

use thiserror::Error;

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("malformed notice key: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("notice handler failed: {0}")]
    Handler(String),
}
