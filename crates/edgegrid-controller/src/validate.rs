//! Pluggable per-type validation.

use async_trait::async_trait;
use edgegrid_core::{ObjType, Object};

use crate::error::ValidationError;

/// Validation rules for one entity type.
///
/// Rules consult caches only (never the store), have no side effects, and
/// reach parent entities through the parents' controllers, which are
/// injected when the rules are built.
#[async_trait]
pub trait Validator<T: Object>: Send + Sync + 'static {
    /// Structural and referential checks on a key that is known to be set.
    async fn validate_key(&self, key: &T::Key) -> Result<(), ValidationError>;

    /// Field checks beyond the key. The key has already been validated.
    async fn validate_fields(&self, _obj: &T) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Fill denormalized fields right before the object is first written.
    async fn prepare_create(&self, _obj: &mut T) {}
}

pub(crate) fn require_name(kind: ObjType, field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { kind, field });
    }
    Ok(())
}
