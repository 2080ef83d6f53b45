use std::sync::Arc;

use async_trait::async_trait;
use edgegrid_core::{Cloudlet, CloudletKey, ObjType, valid_ip};

use crate::apis::OperatorApi;
use crate::cache::ObjApi;
use crate::error::ValidationError;
use crate::validate::{Validator, require_name};

pub type CloudletApi = ObjApi<Cloudlet, CloudletRules>;

/// Cloudlets belong to a known operator.
pub struct CloudletRules {
    operators: Arc<OperatorApi>,
}

impl CloudletRules {
    pub fn new(operators: Arc<OperatorApi>) -> Self {
        Self { operators }
    }
}

#[async_trait]
impl Validator<Cloudlet> for CloudletRules {
    async fn validate_key(&self, key: &CloudletKey) -> Result<(), ValidationError> {
        self.operators.validate_ref(&key.operator_key).await?;
        require_name(ObjType::Cloudlet, "name", &key.name)
    }

    async fn validate_fields(&self, obj: &Cloudlet) -> Result<(), ValidationError> {
        if !obj.access_ip.is_empty() && !valid_ip(&obj.access_ip) {
            return Err(ValidationError::InvalidIp(obj.access_ip.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use edgegrid_core::*;

    use crate::error::{ControllerError, ValidationError};
    use crate::testutil::*;

    #[tokio::test]
    async fn cloudlet_requires_known_operator() {
        let h = harness().await;
        let mut cloudlet = site("site3", 1.0);
        cloudlet.key.operator_key.name = "opB".to_string();

        let err = h.ctrl.cloudlets.create(cloudlet).await.unwrap_err();

        assert!(matches!(
            err,
            ControllerError::Invalid(ValidationError::NotFound { kind: ObjType::Operator, .. })
        ));
    }

    #[tokio::test]
    async fn access_ip_is_optional_but_must_parse() {
        let h = harness().await;

        let bare = Cloudlet {
            access_ip: String::new(),
            ..site("site3", 1.0)
        };
        h.ctrl.cloudlets.create(bare).await.unwrap();

        let bad = Cloudlet {
            access_ip: "300.1.1.1".to_string(),
            ..site("site4", 1.0)
        };
        let err = h.ctrl.cloudlets.create(bad).await.unwrap_err();
        assert!(matches!(err, ControllerError::Invalid(ValidationError::InvalidIp(_))));
    }

    #[tokio::test]
    async fn cloudlet_name_is_required() {
        let h = harness().await;
        let nameless = site("", 1.0);

        let err = h.ctrl.cloudlets.validate_key(&nameless.key).await;

        assert_eq!(
            err,
            Err(ValidationError::EmptyField {
                kind: ObjType::Cloudlet,
                field: "name",
            })
        );
    }
}
