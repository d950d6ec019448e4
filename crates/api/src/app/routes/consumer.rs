//! `/consumer` routes: the product catalog and its reviews.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use farmstand_auth::Permission;
use farmstand_catalog::{ProductFilter, Reviewer};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/filter", post(filter_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/review", post(create_review))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog().list_all().await {
        Ok(products) => (StatusCode::OK, Json(dto::products_to_json(&products))).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn filter_products(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response {
    let body: dto::FilterProductsRequest = match dto::parse_body(&body) {
        Ok(b) => b,
        Err(msg) => return errors::invalid_body(msg),
    };
    let filter = ProductFilter::from(body);
    match services.catalog().filter_by(&filter).await {
        Ok(products) => (StatusCode::OK, Json(dto::products_to_json(&products))).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.catalog().get_by_id(&id).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(principal.as_deref(), Permission::CATALOG_DELETE) {
        return resp;
    }

    match services.catalog().delete(&id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Consumer product removed" })),
        )
            .into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
) -> axum::response::Response {
    let principal = match authz::require(principal.as_deref(), Permission::CATALOG_CREATE) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match services.catalog().create(principal.user_id()).await {
        Ok(product) => (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
    Path(id): Path<String>,
    body: Bytes,
) -> axum::response::Response {
    if let Err(resp) = authz::require(principal.as_deref(), Permission::CATALOG_UPDATE) {
        return resp;
    }

    let body: dto::UpdateProductRequest = match dto::parse_body(&body) {
        Ok(b) => b,
        Err(msg) => return errors::invalid_body(msg),
    };

    match services.catalog().update(&id, body.into()).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_review(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
    Path(id): Path<String>,
    body: Bytes,
) -> axum::response::Response {
    let principal = match authz::require(principal.as_deref(), Permission::CATALOG_REVIEW) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let body: dto::CreateReviewRequest = match dto::parse_body(&body) {
        Ok(b) => b,
        Err(msg) => return errors::invalid_body(msg),
    };

    let rating = match body.rating() {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let reviewer = Reviewer {
        id: principal.user_id(),
        name: principal.name().to_string(),
    };

    match services
        .catalog()
        .add_review(&id, &reviewer, rating, body.comment)
        .await
    {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "message": "Review added" })),
        )
            .into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
