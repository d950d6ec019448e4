use farmstand_core::UserId;

use crate::{JwtClaims, Permission, Role, permissions_from_roles};

/// A fully resolved principal for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    /// Display name, copied onto reviews the principal writes.
    pub name: String,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

impl Principal {
    pub fn new(user_id: UserId, name: impl Into<String>, roles: Vec<Role>) -> Self {
        let permissions = permissions_from_roles(&roles);
        Self {
            user_id,
            name: name.into(),
            roles,
            permissions,
        }
    }

    pub fn from_claims(claims: &JwtClaims) -> Self {
        Self::new(claims.sub, claims.name.clone(), claims.roles.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }
}
