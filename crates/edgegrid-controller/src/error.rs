//! Controller error types.

use edgegrid_core::ObjType;
use edgegrid_state::StoreError;
use thiserror::Error;

/// Rejections raised before any store or cache mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} key not specified")]
    KeyNotSpecified(ObjType),

    #[error("{kind} {field} cannot be empty")]
    EmptyField { kind: ObjType, field: &'static str },

    #[error("{kind} {key} not found")]
    NotFound { kind: ObjType, key: String },

    #[error("{0} id cannot be zero")]
    ZeroId(ObjType),

    #[error("unknown liveness specified")]
    UnknownLiveness,

    #[error("invalid IP specified: {0:?}")]
    InvalidIp(String),
}

/// Errors returned by controller operations.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("object encoding failed: {0}")]
    Codec(#[from] serde_json::Error),
}

impl ControllerError {
    /// True if the store reported the key as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ControllerError::Store(e) if e.is_not_found())
    }
}

pub type ControllerResult<T> = Result<T, ControllerError>;
