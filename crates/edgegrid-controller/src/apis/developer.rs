use async_trait::async_trait;
use edgegrid_core::{Developer, DeveloperKey, ObjType};

use crate::cache::ObjApi;
use crate::error::ValidationError;
use crate::validate::{Validator, require_name};

pub type DeveloperApi = ObjApi<Developer, DeveloperRules>;

pub struct DeveloperRules;

#[async_trait]
impl Validator<Developer> for DeveloperRules {
    async fn validate_key(&self, key: &DeveloperKey) -> Result<(), ValidationError> {
        require_name(ObjType::Developer, "name", &key.name)
    }
}
