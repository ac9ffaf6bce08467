use async_trait::async_trait;

use super::identity_model::UserIdentity;
use crate::errors::Result;

/// Contract for the external identity/role collaborator.
///
/// Resolution happens against whatever user directory the platform runs
/// (out of scope here); the core only depends on this trait.
#[async_trait]
pub trait IdentityProviderTrait: Send + Sync {
    /// Resolves a user id to its identity, or `None` when the user does
    /// not exist.
    async fn resolve(&self, user_id: &str) -> Result<Option<UserIdentity>>;
}
