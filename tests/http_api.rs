// tests/http_api.rs

//! Endpoint-level tests for the request-validation layer: status codes and
//! JSON bodies produced before any database row is touched.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::{json, Value};

use common::{lazy_test_state, setup_tracing};
use hoopstore::web::configure_app_routes;

macro_rules! test_app {
  () => {
    test::init_service(
      App::new()
        .app_data(lazy_test_state())
        .configure(configure_app_routes),
    )
    .await
  };
}

#[actix_web::test]
async fn health_check_reports_ok() {
  setup_tracing();
  let app = test_app!();

  let req = test::TestRequest::get().uri("/api/v1/health").to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn register_rejects_mismatched_passwords() {
  setup_tracing();
  let app = test_app!();

  let req = test::TestRequest::post()
    .uri("/api/v1/auth/register")
    .set_json(json!({
        "username": "newuser",
        "password1": "password1",
        "password2": "password2"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Password and confirmation do not match.");
}

#[actix_web::test]
async fn register_rejects_short_passwords() {
  setup_tracing();
  let app = test_app!();

  let req = test::TestRequest::post()
    .uri("/api/v1/auth/register")
    .set_json(json!({
        "username": "newuser",
        "password1": "short",
        "password2": "short"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("at least 8"));
}

#[actix_web::test]
async fn register_rejects_blank_fields() {
  setup_tracing();
  let app = test_app!();

  let req = test::TestRequest::post()
    .uri("/api/v1/auth/register")
    .set_json(json!({
        "username": "   ",
        "password1": "longenough",
        "password2": "longenough"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "All fields are required.");
}

#[actix_web::test]
async fn login_with_blank_credentials_is_unauthorized() {
  setup_tracing();
  let app = test_app!();

  let req = test::TestRequest::post()
    .uri("/api/v1/auth/login")
    .set_json(json!({"username": "", "password": ""}))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Invalid username or password.");
}

#[actix_web::test]
async fn cart_requires_a_session_token() {
  setup_tracing();
  let app = test_app!();

  let req = test::TestRequest::post()
    .uri("/api/v1/cart/add")
    .set_json(json!({
        "product_id": "123e4567-e89b-12d3-a456-426614174001",
        "quantity": 1
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("X-Session-Token"));
}

#[actix_web::test]
async fn malformed_session_tokens_are_rejected() {
  setup_tracing();
  let app = test_app!();

  let req = test::TestRequest::get()
    .uri("/api/v1/orders")
    .insert_header(("X-Session-Token", "not-a-uuid"))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("Invalid"));
}

#[actix_web::test]
async fn logout_without_token_is_unauthorized() {
  setup_tracing();
  let app = test_app!();

  let req = test::TestRequest::post().uri("/api/v1/auth/logout").to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn checkout_requires_a_session_token() {
  setup_tracing();
  let app = test_app!();

  let req = test::TestRequest::post()
    .uri("/api/v1/checkout")
    .set_json(json!({
        "full_name": "Test User",
        "address": "123 Test St",
        "city": "Testville",
        "postal_code": "12345"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn wishlist_requires_a_session_token() {
  setup_tracing();
  let app = test_app!();

  let req = test::TestRequest::post()
    .uri("/api/v1/wishlist/toggle/123e4567-e89b-12d3-a456-426614174001")
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn reports_require_a_session_token() {
  setup_tracing();
  let app = test_app!();

  let req = test::TestRequest::get().uri("/api/v1/reports").to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn unknown_routes_are_not_found() {
  setup_tracing();
  let app = test_app!();

  let req = test::TestRequest::get().uri("/api/v1/does-not-exist").to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
