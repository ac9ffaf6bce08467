use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::identity_model::{Role, UserIdentity};
use super::identity_traits::IdentityProviderTrait;
use crate::errors::Result;

/// In-memory identity provider backed by a fixed user map.
///
/// Used when the platform runs without a directory service (local
/// deployments, tests). Registration order is not significant.
#[derive(Default)]
pub struct StaticIdentityProvider {
    users: RwLock<HashMap<String, UserIdentity>>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, user_id: impl Into<String>, roles: impl IntoIterator<Item = Role>) {
        let user_id = user_id.into();
        let identity = UserIdentity {
            user_id: user_id.clone(),
            roles: roles.into_iter().collect(),
        };
        self.users.write().unwrap().insert(user_id, identity);
    }
}

#[async_trait]
impl IdentityProviderTrait for StaticIdentityProvider {
    async fn resolve(&self, user_id: &str) -> Result<Option<UserIdentity>> {
        Ok(self.users.read().unwrap().get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_registered_user() {
        let provider = StaticIdentityProvider::new();
        provider.register("user-1", [Role::Investor, Role::Designer]);

        let identity = provider.resolve("user-1").await.unwrap().unwrap();
        assert!(identity.has_role(Role::Investor));
        assert!(!identity.has_role(Role::Admin));

        assert!(provider.resolve("nobody").await.unwrap().is_none());
    }
}
