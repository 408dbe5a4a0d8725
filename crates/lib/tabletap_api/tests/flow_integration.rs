//! End-to-end flow against a real database.
//!
//! Requires `TEST_DATABASE_URL` pointing at a disposable PostgreSQL
//! database; skips (passing) when it is unset.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use tabletap_api::{AppState, config::ApiConfig};
use tower::ServiceExt;

const WEBHOOK_SECRET: &str = "sk_test_webhook";

fn sign(body: &str) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Connect to the test database, migrate, and build the router. Returns
/// `None` (test skips, passing) when `TEST_DATABASE_URL` is unset.
async fn setup() -> Option<(Router, sqlx::PgPool)> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return None;
    };

    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .expect("connect to test database");
    tabletap_api::migrate(&pool).await.expect("migrate");

    let state = AppState {
        pool: pool.clone(),
        config: ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            pg_connection_url: database_url,
            jwt_secret: "test-secret".into(),
            paystack_secret_key: WEBHOOK_SECRET.into(),
        },
    };
    Some((tabletap_api::router(state), pool))
}

/// Register a fresh owner account, returning (access token, user ID,
/// tenant schema).
async fn register_owner(app: &Router) -> (String, String, String) {
    let email = format!(
        "owner{}@example.com",
        chrono::Utc::now().timestamp_nanos_opt().unwrap()
    );
    let (status, token_resp) = send(
        app,
        post_json(
            "/api/auth/register",
            None,
            serde_json::json!({
                "email": email,
                "password": "hunter2hunter2",
                "name": "Owner",
                "restaurant_name": "Mama K"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {token_resp}");
    let token = token_resp["access_token"].as_str().expect("token").to_string();

    let (status, profile) = send(app, get("/api/auth/profile", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let user_id = profile["user"]["id"].as_str().unwrap().to_string();
    let tenant_schema = profile["tenant_schema"].as_str().unwrap().to_string();
    (token, user_id, tenant_schema)
}

async fn seed_tool(pool: &sqlx::PgPool, name: &str) -> String {
    sqlx::query_scalar::<_, String>(
        "INSERT INTO tools (name, url) VALUES ($1, 'https://pos.tabletap.space') \
         RETURNING id::text",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .expect("seed tool")
}

#[tokio::test]
async fn register_subscribe_pay_and_sso_flow() {
    let Some((app, pool)) = setup().await else {
        return;
    };

    let email = format!(
        "owner{}@example.com",
        chrono::Utc::now().timestamp_nanos_opt().unwrap()
    );
    let (status, token_resp) = send(
        &app,
        post_json(
            "/api/auth/register",
            None,
            serde_json::json!({
                "email": email,
                "password": "hunter2hunter2",
                "name": "Owner",
                "restaurant_name": "Mama K"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {token_resp}");
    let token = token_resp["access_token"].as_str().expect("token").to_string();

    let (status, profile) = send(&app, get("/api/auth/profile", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["user"]["email"], email);
    let tenant_schema = profile["tenant_schema"].as_str().unwrap().to_string();
    assert!(tenant_schema.starts_with("tenant_"));

    // Seed a monthly plan and subscribe. Registration starts a trial when
    // a plan is already seeded (other tests share the database), so clear
    // any existing subscription to exercise the subscribe path itself.
    let plan_id = sqlx::query_scalar::<_, String>(
        "INSERT INTO plans (name, price_usd, billing_cycle) \
         VALUES ('Starter', 5000, 'monthly') RETURNING id::text",
    )
    .fetch_one(&pool)
    .await
    .expect("seed plan");
    let tenant_id = sqlx::query_scalar::<_, String>(
        "SELECT id::text FROM tenants WHERE schema_name = $1",
    )
    .bind(&tenant_schema)
    .fetch_one(&pool)
    .await
    .expect("tenant id");
    sqlx::query("DELETE FROM subscriptions WHERE tenant_id = $1::uuid")
        .bind(&tenant_id)
        .execute(&pool)
        .await
        .expect("clear trial subscription");

    let (status, subscription) = send(
        &app,
        post_json(
            "/api/subscription",
            Some(&token),
            serde_json::json!({"plan_id": plan_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "subscribe failed: {subscription}");
    assert_eq!(subscription["status"], "trialing");
    let subscription_id = subscription["id"].as_str().unwrap().to_string();

    // Creating a second subscription for the same tenant fails.
    let (status, body) = send(
        &app,
        post_json(
            "/api/subscription",
            Some(&token),
            serde_json::json!({"plan_id": plan_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Subscription already exists");

    // Pending payment, settled by a signed charge.success.
    let reference = "ttc_0a1b2c3d4e5f";
    tabletap_core::billing::queries::insert_payment(
        &pool,
        &subscription_id,
        5000,
        "USD",
        reference,
        "AC_test",
    )
    .await
    .expect("insert payment");

    let webhook_body = serde_json::json!({
        "event": "charge.success",
        "data": {"reference": reference, "channel": "card"}
    })
    .to_string();
    let (status, ack) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/webhook/paystack")
            .header("content-type", "application/json")
            .header("x-paystack-signature", sign(&webhook_body))
            .body(Body::from(webhook_body.clone()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "webhook failed: {ack}");
    assert_eq!(ack["status"], "processed");

    let (status, subscription) = send(&app, get("/api/subscription", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subscription["status"], "active");
    let period_start =
        chrono::DateTime::parse_from_rfc3339(subscription["current_period_start"].as_str().unwrap())
            .unwrap();
    let period_end =
        chrono::DateTime::parse_from_rfc3339(subscription["current_period_end"].as_str().unwrap())
            .unwrap();
    assert_eq!((period_end - period_start).num_days(), 30);
    let first_period_end = subscription["current_period_end"].clone();

    // Duplicate delivery: acknowledged, but the period is not extended again.
    let (status, ack) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/webhook/paystack")
            .header("content-type", "application/json")
            .header("x-paystack-signature", sign(&webhook_body))
            .body(Body::from(webhook_body.clone()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "processed");
    let (_, subscription) = send(&app, get("/api/subscription", &token)).await;
    assert_eq!(subscription["current_period_end"], first_period_end);

    // Unknown reference: 404, gateway will retry.
    let unknown_body = serde_json::json!({
        "event": "charge.success",
        "data": {"reference": "ttc_ffffffffffff", "channel": "card"}
    })
    .to_string();
    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/webhook/paystack")
            .header("content-type", "application/json")
            .header("x-paystack-signature", sign(&unknown_body))
            .body(Body::from(unknown_body))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Payment not found");

    // Payment history shows the settled charge.
    let (status, payments) = send(&app, get("/api/payments", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payments[0]["status"], "success");
    assert_eq!(payments[0]["paystack_reference"], reference);

    // SSO: issuance is gated on an explicit grant.
    let tool_id = sqlx::query_scalar::<_, String>(
        "INSERT INTO tools (name, url) \
         VALUES ('TableTap POS', 'https://pos.tabletap.space') RETURNING id::text",
    )
    .fetch_one(&pool)
    .await
    .expect("seed tool");

    let (status, body) = send(
        &app,
        post_json(
            "/api/sso/generate",
            Some(&token),
            serde_json::json!({"tool_id": tool_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "expected denial: {body}");
    assert_eq!(body["error"], "Access denied");

    let user_id = profile["user"]["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        post_json(
            "/api/tools/access",
            Some(&token),
            serde_json::json!({"user_id": user_id, "tool_id": tool_id, "is_granted": true}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, issued) = send(
        &app,
        post_json(
            "/api/sso/generate",
            Some(&token),
            serde_json::json!({"tool_id": tool_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "generate failed: {issued}");
    let sso_token = issued["token"].as_str().unwrap().to_string();

    // First verification wins and binds the issued identity.
    let (status, verified) = send(
        &app,
        post_json(
            "/api/sso/verify",
            None,
            serde_json::json!({"token": sso_token}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "verify failed: {verified}");
    assert_eq!(verified["valid"], true);
    assert_eq!(verified["user_id"].as_str().unwrap(), user_id);
    assert_eq!(verified["tool_id"], tool_id.as_str());
    assert_eq!(verified["tenant_schema"].as_str().unwrap(), tenant_schema);

    // Second verification of the same token is rejected.
    let (status, body) = send(
        &app,
        post_json(
            "/api/sso/verify",
            None,
            serde_json::json!({"token": sso_token}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Token expired or invalid");

    // A token we never issued is not found.
    let (status, body) = send(
        &app,
        post_json(
            "/api/sso/verify",
            None,
            serde_json::json!({"token": "ey.never.issued"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid token");

    // Tables: bulk range, then a duplicate number is rejected.
    let (status, tables) = send(
        &app,
        post_json(
            "/api/tables/bulk",
            Some(&token),
            serde_json::json!({"fromTable": 1, "toTable": 3}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "bulk create failed: {tables}");
    assert_eq!(tables.as_array().unwrap().len(), 3);
    let url = tables[0]["qr_code_url"].as_str().unwrap();
    assert_eq!(
        url,
        format!("https://menu.tabletap.space/{tenant_schema}/1")
    );

    let (status, body) = send(
        &app,
        post_json(
            "/api/tables",
            Some(&token),
            serde_json::json!({"number": 2}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Table number already exists");

    // Analytics: track, then read it back from the dashboard.
    let (status, tracked) = send(
        &app,
        post_json(
            "/api/analytics/track",
            Some(&token),
            serde_json::json!({"event_type": "menu_view", "data": {"table": 2}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "track failed: {tracked}");

    let (status, dashboard) = send(&app, get("/api/analytics/dashboard", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(dashboard["today_events"].as_i64().unwrap() >= 1);
}

/// A token past its expiry is rejected even though it was never consumed.
#[tokio::test]
async fn expired_sso_token_is_rejected() {
    let Some((app, pool)) = setup().await else {
        return;
    };
    let (_token, user_id, tenant_schema) = register_owner(&app).await;
    let tool_id = seed_tool(&pool, "TableTap Menu CMS").await;

    // Backdate the row; the raw token string never reaches a signature
    // check because the expiry guard fires first.
    let stale = format!(
        "stale-{}",
        chrono::Utc::now().timestamp_nanos_opt().unwrap()
    );
    tabletap_core::sso::queries::insert_token(
        &pool,
        &stale,
        &tabletap_core::sso::hash_token(&stale),
        &user_id,
        &tool_id,
        &tenant_schema,
        chrono::Utc::now() - chrono::Duration::minutes(5),
    )
    .await
    .expect("insert stale token");

    let (status, body) = send(
        &app,
        post_json("/api/sso/verify", None, serde_json::json!({"token": stale})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Token expired or invalid");
}

/// A settled charge on a yearly plan extends the period by exactly 365
/// days.
#[tokio::test]
async fn yearly_plan_settles_to_365_day_period() {
    let Some((app, pool)) = setup().await else {
        return;
    };
    let (token, _user_id, tenant_schema) = register_owner(&app).await;

    let plan_id = sqlx::query_scalar::<_, String>(
        "INSERT INTO plans (name, price_usd, billing_cycle) \
         VALUES ('Pro Annual', 50000, 'yearly') RETURNING id::text",
    )
    .fetch_one(&pool)
    .await
    .expect("seed yearly plan");

    // Registration may already have started a trial on whichever plan was
    // cheapest; pin the subscription to the yearly plan instead.
    let tenant_id = sqlx::query_scalar::<_, String>(
        "SELECT id::text FROM tenants WHERE schema_name = $1",
    )
    .bind(&tenant_schema)
    .fetch_one(&pool)
    .await
    .expect("tenant id");
    sqlx::query("DELETE FROM subscriptions WHERE tenant_id = $1::uuid")
        .bind(&tenant_id)
        .execute(&pool)
        .await
        .expect("clear trial subscription");
    let subscription =
        tabletap_core::billing::queries::create_subscription(&pool, &tenant_id, &plan_id, 7)
            .await
            .expect("create subscription");

    let reference = format!(
        "ttc_y{}",
        chrono::Utc::now().timestamp_nanos_opt().unwrap()
    );
    tabletap_core::billing::queries::insert_payment(
        &pool,
        &subscription.id,
        50000,
        "USD",
        &reference,
        "AC_test",
    )
    .await
    .expect("insert payment");

    let webhook_body = serde_json::json!({
        "event": "charge.success",
        "data": {"reference": reference, "channel": "card"}
    })
    .to_string();
    let (status, ack) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/webhook/paystack")
            .header("content-type", "application/json")
            .header("x-paystack-signature", sign(&webhook_body))
            .body(Body::from(webhook_body))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "webhook failed: {ack}");

    let (status, subscription) = send(&app, get("/api/subscription", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subscription["status"], "active");
    let period_start = chrono::DateTime::parse_from_rfc3339(
        subscription["current_period_start"].as_str().unwrap(),
    )
    .unwrap();
    let period_end = chrono::DateTime::parse_from_rfc3339(
        subscription["current_period_end"].as_str().unwrap(),
    )
    .unwrap();
    assert_eq!((period_end - period_start).num_days(), 365);
}

/// Two racing verifications of the same token admit at most one caller.
#[tokio::test]
async fn concurrent_sso_verification_admits_one() {
    let Some((app, pool)) = setup().await else {
        return;
    };
    let (token, user_id, _tenant_schema) = register_owner(&app).await;
    let tool_id = seed_tool(&pool, "TableTap POS Race").await;

    let (status, _) = send(
        &app,
        post_json(
            "/api/tools/access",
            Some(&token),
            serde_json::json!({"user_id": user_id, "tool_id": tool_id, "is_granted": true}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, issued) = send(
        &app,
        post_json(
            "/api/sso/generate",
            Some(&token),
            serde_json::json!({"tool_id": tool_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "generate failed: {issued}");
    let sso_token = issued["token"].as_str().unwrap();

    let verify = serde_json::json!({"token": sso_token});
    let (first, second) = tokio::join!(
        send(&app, post_json("/api/sso/verify", None, verify.clone())),
        send(&app, post_json("/api/sso/verify", None, verify.clone())),
    );

    let successes = [&first, &second]
        .iter()
        .filter(|r| r.0 == StatusCode::OK)
        .count();
    assert_eq!(successes, 1, "first: {first:?}, second: {second:?}");
    for (status, body) in [first, second] {
        if status != StatusCode::OK {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Token expired or invalid");
        }
    }
}
