use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use farmstand_api::app::services::AppServices;
use farmstand_auth::{Hs256JwtValidator, JwtClaims, Role};
use farmstand_core::{ProductId, UserId};
use reqwest::StatusCode;
use serde_json::json;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, fresh in-memory store, ephemeral port.
        let app = farmstand_api::app::build_app(
            JWT_SECRET.to_string(),
            Arc::new(AppServices::in_memory()),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(user: UserId, name: &str, roles: Vec<Role>) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: user,
        name: name.to_string(),
        roles,
        issued_at: now - ChronoDuration::seconds(5),
        expires_at: now + ChronoDuration::minutes(10),
    };

    Hs256JwtValidator::new(JWT_SECRET)
        .sign(&claims)
        .expect("failed to encode jwt")
}

fn admin_token() -> String {
    mint_jwt(UserId::new(), "Admin", vec![Role::admin()])
}

async fn create_product(client: &reqwest::Client, srv: &TestServer, token: &str) -> String {
    let res = client
        .post(srv.url("/consumer"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn review(
    client: &reqwest::Client,
    srv: &TestServer,
    id: &str,
    token: &str,
    body: serde_json::Value,
) -> reqwest::Response {
    client
        .post(srv.url(&format!("/consumer/{id}/review")))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn get_product(client: &reqwest::Client, srv: &TestServer, id: &str) -> reqwest::Response {
    client
        .get(srv.url(&format!("/consumer/{id}")))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_update_review_scenario() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let owner = UserId::new();
    let admin = mint_jwt(owner, "Owner", vec![Role::admin()]);

    // Create: placeholder content, owner from token
    let res = client
        .post(srv.url("/consumer"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["owner"], owner.to_string());
    assert_eq!(created["price"], 0.0);
    assert_eq!(created["quantity"], 0);
    assert_eq!(created["name"], "Sample name");
    let id = created["id"].as_str().unwrap().to_string();

    // Update
    let res = client
        .put(srv.url(&format!("/consumer/{id}")))
        .bearer_auth(&admin)
        .json(&json!({
            "prod_name": "Rice",
            "price": 50,
            "image": "/images/consumer/rice.jpg",
            "seller_name": "Green Acres",
            "prod_size": "1kg",
            "quantity": 12,
            "avalaible_location": "Pune"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = get_product(&client, &srv, &id).await;
    assert_eq!(res.status(), StatusCode::OK);
    let product: serde_json::Value = res.json().await.unwrap();
    assert_eq!(product["name"], "Rice");
    assert_eq!(product["price"], 50.0);
    assert_eq!(product["owner"], owner.to_string());

    // Reviews from two different users
    let u2 = mint_jwt(UserId::new(), "u2", vec![]);
    let u3 = mint_jwt(UserId::new(), "u3", vec![Role::new("customer")]);

    let res = review(&client, &srv, &id, &u2, json!({ "rating": 4, "comment": "good" })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Review added");

    let product: serde_json::Value = get_product(&client, &srv, &id).await.json().await.unwrap();
    assert_eq!(product["num_reviews"], 1);
    assert_eq!(product["rating"], 4.0);

    let res = review(&client, &srv, &id, &u3, json!({ "rating": "2", "comment": "ok" })).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let product: serde_json::Value = get_product(&client, &srv, &id).await.json().await.unwrap();
    assert_eq!(product["num_reviews"], 2);
    assert_eq!(product["rating"], 3.0);
    assert_eq!(product["reviews"][0]["name"], "u2");
    assert_eq!(product["reviews"][1]["name"], "u3");

    // Same user again: rejected, count unchanged
    let res = review(&client, &srv, &id, &u2, json!({ "rating": 5, "comment": "x" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "already_reviewed");

    let product: serde_json::Value = get_product(&client, &srv, &id).await.json().await.unwrap();
    assert_eq!(product["num_reviews"], 2);
}

#[tokio::test]
async fn list_and_filter_are_public() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = admin_token();

    let id = create_product(&client, &srv, &admin).await;
    create_product(&client, &srv, &admin).await;

    let res = client
        .put(srv.url(&format!("/consumer/{id}")))
        .bearer_auth(&admin)
        .json(&json!({ "prod_name": "Wheat", "avalaible_location": "Nashik" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(srv.url("/consumer")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let all: serde_json::Value = res.json().await.unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let res = client
        .post(srv.url("/consumer/filter"))
        .json(&json!({ "prod_name": "Wheat", "avalaible_location": "Nashik" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let hits: serde_json::Value = res.json().await.unwrap();
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["id"], id);

    // No match is an empty list, not an error
    let res = client
        .post(srv.url("/consumer/filter"))
        .json(&json!({ "prod_name": "Wheat", "avalaible_location": "Pune" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let hits: serde_json::Value = res.json().await.unwrap();
    assert!(hits.as_array().unwrap().is_empty());

    // Missing criterion matches nothing
    let res = client
        .post(srv.url("/consumer/filter"))
        .json(&json!({ "prod_name": "Wheat" }))
        .send()
        .await
        .unwrap();
    let hits: serde_json::Value = res.json().await.unwrap();
    assert!(hits.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn admin_routes_require_admin() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Anonymous
    let res = client.post(srv.url("/consumer")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Authenticated, not admin
    let customer = mint_jwt(UserId::new(), "Customer", vec![Role::new("customer")]);
    let res = client
        .post(srv.url("/consumer"))
        .bearer_auth(&customer)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let id = create_product(&client, &srv, &admin_token()).await;

    let res = client
        .delete(srv.url(&format!("/consumer/{id}")))
        .bearer_auth(&customer)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .put(srv.url(&format!("/consumer/{id}")))
        .bearer_auth(&customer)
        .json(&json!({ "prod_name": "Hacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Reviews need a token, but not admin
    let res = client
        .post(srv.url(&format!("/consumer/{id}/review")))
        .json(&json!({ "rating": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_token_is_rejected_even_on_public_routes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/consumer"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_and_unknown_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = get_product(&client, &srv, "not-an-id").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");

    let res = get_product(&client, &srv, &ProductId::new().to_string()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");

    let res = client
        .put(srv.url(&format!("/consumer/{}", ProductId::new())))
        .bearer_auth(admin_token())
        .json(&json!({ "prod_name": "Rice" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = admin_token();

    let id = create_product(&client, &srv, &admin).await;

    let res = client
        .delete(srv.url(&format!("/consumer/{id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Consumer product removed");

    let res = get_product(&client, &srv, &id).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(srv.url(&format!("/consumer/{id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let id = create_product(&client, &srv, &admin_token()).await;
    let user = mint_jwt(UserId::new(), "Meera", vec![]);

    let res = review(&client, &srv, &id, &user, json!({ "rating": 9 })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let product: serde_json::Value = get_product(&client, &srv, &id).await.json().await.unwrap();
    assert_eq!(product["num_reviews"], 0);
}

#[tokio::test]
async fn whoami_reports_token_identity() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let user = UserId::new();
    let token = mint_jwt(user, "Meera", vec![Role::new("customer")]);

    let res = client
        .get(srv.url("/whoami"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user_id"], user.to_string());
    assert_eq!(body["name"], "Meera");
    assert!(body["roles"].as_array().unwrap().iter().any(|r| r == "customer"));

    let res = client.get(srv.url("/whoami")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn filter_without_body_is_an_empty_list() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_product(&client, &srv, &admin_token()).await;

    let res = client.post(srv.url("/consumer/filter")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn null_fields_fall_back_to_empty_defaults() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = admin_token();
    let id = create_product(&client, &srv, &admin).await;

    let res = client
        .put(srv.url(&format!("/consumer/{id}")))
        .bearer_auth(&admin)
        .json(&json!({ "prod_name": "Rice", "price": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Rice");
    assert_eq!(body["price"], 0.0);

    let buyer = mint_jwt(UserId::new(), "Buyer", vec![]);
    let res = review(&client, &srv, &id, &buyer, json!({ "rating": 4, "comment": null })).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let product: serde_json::Value = get_product(&client, &srv, &id).await.json().await.unwrap();
    assert_eq!(product["reviews"][0]["comment"], "");
}

#[tokio::test]
async fn malformed_body_uses_json_error_shape() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = admin_token();
    let id = create_product(&client, &srv, &admin).await;

    let res = client
        .put(srv.url(&format!("/consumer/{id}")))
        .bearer_auth(&admin)
        .header("content-type", "application/json")
        .body(r#"{"price": "cheap"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");
    assert!(body["message"].is_string());

    let res = client
        .post(srv.url("/consumer/filter"))
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");
}
