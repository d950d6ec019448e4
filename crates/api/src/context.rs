use farmstand_auth::{Principal, Role};
use farmstand_core::UserId;

/// Principal context for a request (authenticated identity + roles).
///
/// Inserted by the auth middleware only when a valid bearer token was sent;
/// public routes run without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn user_id(&self) -> UserId {
        self.principal.user_id
    }

    pub fn name(&self) -> &str {
        &self.principal.name
    }

    pub fn roles(&self) -> &[Role] {
        &self.principal.roles
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
