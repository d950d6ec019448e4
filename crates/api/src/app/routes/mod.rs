use axum::{Router, routing::get};

pub mod consumer;
pub mod system;

/// Router for catalog endpoints. Access control happens per handler, since
/// reads are public and writes are not.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/consumer", consumer::router())
}
