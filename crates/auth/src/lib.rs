//! `farmstand-auth`: authentication/authorization boundary.
//!
//! This crate is decoupled from HTTP and storage: it validates bearer tokens
//! and answers "may this principal do X" questions.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{authorize, permissions_from_roles, AuthzError};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
pub use permissions::Permission;
pub use principal::Principal;
pub use roles::Role;
