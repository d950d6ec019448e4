use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use farmstand_core::DomainError;
use farmstand_infra::{CatalogError, StoreError};

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::Domain(e) => domain_error_to_response(e),
        CatalogError::Store(e) => {
            tracing::error!(error = %e, "product store failure");
            match e {
                StoreError::Unavailable(msg) => {
                    json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
                }
                StoreError::Serialization(msg) | StoreError::Backend(msg) => {
                    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
                }
            }
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "Consumer Product not Found",
        ),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::AlreadyReviewed => json_error(
            StatusCode::BAD_REQUEST,
            "already_reviewed",
            "Product already reviewed",
        ),
    }
}

pub fn invalid_body(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", message)
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
