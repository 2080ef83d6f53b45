use async_trait::async_trait;
use edgegrid_core::{ObjType, Operator, OperatorKey};

use crate::cache::ObjApi;
use crate::error::ValidationError;
use crate::validate::{Validator, require_name};

pub type OperatorApi = ObjApi<Operator, OperatorRules>;

pub struct OperatorRules;

#[async_trait]
impl Validator<Operator> for OperatorRules {
    async fn validate_key(&self, key: &OperatorKey) -> Result<(), ValidationError> {
        require_name(ObjType::Operator, "name", &key.name)
    }
}
