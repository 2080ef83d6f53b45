use std::sync::Arc;

use async_trait::async_trait;
use edgegrid_core::{App, AppKey, ObjType};

use crate::apis::DeveloperApi;
use crate::cache::ObjApi;
use crate::error::ValidationError;
use crate::validate::{Validator, require_name};

pub type AppApi = ObjApi<App, AppRules>;

/// Apps belong to a known developer.
pub struct AppRules {
    developers: Arc<DeveloperApi>,
}

impl AppRules {
    pub fn new(developers: Arc<DeveloperApi>) -> Self {
        Self { developers }
    }
}

#[async_trait]
impl Validator<App> for AppRules {
    async fn validate_key(&self, key: &AppKey) -> Result<(), ValidationError> {
        self.developers.validate_ref(&key.developer_key).await?;
        require_name(ObjType::App, "name", &key.name)
    }
}
