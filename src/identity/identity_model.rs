//! Caller identity and role models.
//!
//! Authentication and role resolution are owned by an external identity
//! collaborator; the core only consumes resolved identities. No identities
//! are ever hard-coded here.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{Error, Result};

/// Roles a platform user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Investor,
    Designer,
    Manufacturer,
    Admin,
}

/// The authenticated caller of a service operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerIdentity {
    pub user_id: String,
    pub roles: HashSet<Role>,
}

impl CallerIdentity {
    pub fn new(user_id: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            user_id: user_id.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// A platform user as resolved by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub user_id: String,
    pub roles: HashSet<Role>,
}

impl UserIdentity {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Fails with `AuthenticationError` when no caller identity is attached.
pub fn require_caller(caller: Option<&CallerIdentity>) -> Result<&CallerIdentity> {
    caller.ok_or_else(|| Error::Authentication("No caller identity provided".to_string()))
}

/// Fails with `AuthorizationError` when the caller lacks the given role.
pub fn require_role(caller: &CallerIdentity, role: Role) -> Result<()> {
    if caller.has_role(role) {
        Ok(())
    } else {
        Err(Error::Authorization(format!(
            "Caller {} does not hold the {:?} role",
            caller.user_id, role
        )))
    }
}
