// Module declarations
pub(crate) mod identity_model;
pub(crate) mod identity_traits;
pub(crate) mod static_provider;

// Re-export the public interface
pub use identity_model::{require_caller, require_role, CallerIdentity, Role, UserIdentity};
pub use identity_traits::IdentityProviderTrait;
pub use static_provider::StaticIdentityProvider;
