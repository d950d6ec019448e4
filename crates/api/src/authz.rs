//! API-side authorization guard.
//!
//! Routes call this before touching the catalog; the catalog itself stays
//! auth-agnostic.

use axum::http::StatusCode;
use axum::response::Response;

use farmstand_auth::{Permission, authorize};

use crate::app::errors;
use crate::context::PrincipalContext;

/// Require an authenticated principal holding `required`.
///
/// - no principal → 401
/// - principal without the permission → 403
pub fn require<'a>(
    principal: Option<&'a PrincipalContext>,
    required: &'static str,
) -> Result<&'a PrincipalContext, Response> {
    let Some(principal) = principal else {
        return Err(errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "Not authorized, no token",
        ));
    };

    authorize(principal.principal(), &Permission::new(required))
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))?;

    Ok(principal)
}
