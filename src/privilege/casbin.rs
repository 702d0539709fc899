use ::casbin::{CoreApi, DefaultModel, Enforcer, FileAdapter};
use log::debug;

use crate::context::UserInfo;
use crate::error::Error;

/// Role based access control. Policies are `(role, resource, action)` rows.
pub struct Privilege {
    enforcer: Enforcer,
}

impl Privilege {
    pub async fn new(model: &str, policy: &str) -> Result<Self, Error> {
        let model = DefaultModel::from_file(model).await.map_err(|e| Error::CasbinError(e.to_string()))?;
        let enforcer = Enforcer::new(model, FileAdapter::new(policy.to_owned()))
            .await
            .map_err(|e| Error::CasbinError(e.to_string()))?;
        Ok(Self { enforcer })
    }

    pub fn check(&self, user: &UserInfo, resource: &str, action: &str) -> Result<(), Error> {
        let role = user.role.as_str();
        let allowed = self
            .enforcer
            .enforce((role, resource, action))
            .map_err(|e| Error::CasbinError(e.to_string()))?;
        if !allowed {
            debug!("denied {} {} {} for user {}", role, action, resource, user.id);
            return Err(Error::Unauthorized(format!("{} may not {} {}", role, action, resource)));
        }
        Ok(())
    }
}
