//! Router-level tests that need no live database: auth rejection and
//! webhook signature enforcement all short-circuit before any query runs.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use tabletap_api::{AppState, config::ApiConfig};
use tower::ServiceExt;

const WEBHOOK_SECRET: &str = "sk_test_webhook";

fn test_state() -> AppState {
    // Lazy pool: no connection is made until a query executes, and these
    // tests never execute one.
    let pool = sqlx::PgPool::connect_lazy("postgres://localhost:5432/tabletap_test")
        .expect("lazy pool");
    AppState {
        pool,
        config: ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            pg_connection_url: "postgres://localhost:5432/tabletap_test".into(),
            jwt_secret: "test-secret".into(),
            paystack_secret_key: WEBHOOK_SECRET.into(),
        },
    }
}

fn sign(body: &str) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

#[tokio::test]
async fn protected_route_rejects_missing_header() {
    let app = tabletap_api::router(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/tools")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "Missing authorization header");
}

#[tokio::test]
async fn protected_route_rejects_bad_scheme() {
    let app = tabletap_api::router(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/profile")
                .header("authorization", "Basic abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_rejects_garbage_token() {
    let app = tabletap_api::router(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/tables")
                .header("authorization", "Bearer not.a.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

#[tokio::test]
async fn webhook_rejects_missing_signature() {
    let app = tabletap_api::router(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhook/paystack")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"event":"charge.success"}"#))
                .unwrap(),
        )
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_rejects_invalid_signature() {
    let app = tabletap_api::router(test_state());
    let body = r#"{"event":"charge.success","data":{"reference":"ttc_0a1b2c3d4e5f"}}"#;
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhook/paystack")
                .header("content-type", "application/json")
                .header("x-paystack-signature", "0".repeat(128))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "Invalid webhook signature");
}

#[tokio::test]
async fn webhook_rejects_signature_over_tampered_body() {
    let app = tabletap_api::router(test_state());
    let signed = r#"{"event":"charge.success","data":{"reference":"ttc_0a1b2c3d4e5f"}}"#;
    let tampered = r#"{"event":"charge.success","data":{"reference":"ttc_ffffffffffff"}}"#;
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhook/paystack")
                .header("content-type", "application/json")
                .header("x-paystack-signature", sign(signed))
                .body(Body::from(tampered))
                .unwrap(),
        )
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_acks_unhandled_event_types() {
    let app = tabletap_api::router(test_state());
    let body = r#"{"event":"invoice.create","data":{"reference":""}}"#;
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhook/paystack")
                .header("content-type", "application/json")
                .header("x-paystack-signature", sign(body))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "processed");
}

#[tokio::test]
async fn webhook_rejects_malformed_json_after_valid_signature() {
    let app = tabletap_api::router(test_state());
    let body = "not json at all";
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhook/paystack")
                .header("x-paystack-signature", sign(body))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
