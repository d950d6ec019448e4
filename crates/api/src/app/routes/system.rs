use axum::{Extension, Json, http::StatusCode, response::IntoResponse};

use crate::app::errors;
use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(principal: Option<Extension<PrincipalContext>>) -> axum::response::Response {
    let Some(Extension(principal)) = principal else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "Not authorized, no token",
        );
    };

    Json(serde_json::json!({
        "user_id": principal.user_id().to_string(),
        "name": principal.name(),
        "roles": principal.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
    .into_response()
}
