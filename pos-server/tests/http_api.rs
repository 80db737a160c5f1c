//! Router-level tests: the full middleware stack driven with `oneshot`.

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use pos_server::api::build_app;
use pos_server::{Config, ErrorCode, ServerState};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let state = ServerState::initialize(Config {
        seed_demo_data: true,
        ..Config::for_tests()
    })
    .await
    .unwrap();
    build_app(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    tenant: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(tenant) = tenant {
        builder = builder.header("x-tenant-id", tenant);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {} failed: {}", username, body);
    body["token"].as_str().unwrap().to_string()
}

fn error_code(body: &Value) -> u64 {
    body["code"].as_u64().unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["ai_enabled"], false);
}

#[tokio::test]
async fn test_login_returns_bound_tenant() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        None,
        Some(json!({ "username": "kasir1", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "cashier");
    assert_eq!(body["tenant"]["id"], "v1");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        None,
        Some(json!({ "username": "kasir1", "password": "salah" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), u64::from(ErrorCode::InvalidCredentials.code()));
}

#[tokio::test]
async fn test_api_requires_token() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/products", None, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), u64::from(ErrorCode::NotAuthenticated.code()));

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/products",
        Some("not-a-token"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cashier_cannot_manage_tenants_or_catalog() {
    let app = app().await;
    let token = login(&app, "kasir1", "123").await;

    let (status, body) = send(&app, Method::GET, "/api/tenants", Some(&token), None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), u64::from(ErrorCode::PermissionDenied.code()));

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/products/1",
        Some(&token),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Reading the catalog is fine
    let (status, body) = send(&app, Method::GET, "/api/products", Some(&token), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_super_admin_must_select_tenant() {
    let app = app().await;
    let token = login(&app, "superadmin", "admin").await;

    let (status, body) = send(&app, Method::GET, "/api/products", Some(&token), None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), u64::from(ErrorCode::TenantNotSelected.code()));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/products",
        Some(&token),
        Some("v2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert!(products.iter().all(|p| p["vendor_id"] == "v2"));

    let (status, body) = send(&app, Method::GET, "/api/tenants", Some(&token), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_cashier_header_is_ignored() {
    let app = app().await;
    let token = login(&app, "kasir1", "123").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/products/101",
        Some(&token),
        Some("v2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), u64::from(ErrorCode::ProductNotFound.code()));
}

#[tokio::test]
async fn test_cart_checkout_flow() {
    let app = app().await;
    let token = login(&app, "kasir1", "123").await;
    let token = Some(token.as_str());

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/cart/items",
            token,
            None,
            Some(json!({ "product_id": "1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, cart) = send(&app, Method::GET, "/api/cart", token, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["totals"]["subtotal"], 56_000);
    assert_eq!(cart["totals"]["total"], 64_680);

    let (status, cart) = send(
        &app,
        Method::POST,
        "/api/cart/payment",
        token,
        None,
        Some(json!({ "method": "cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["phase"], "payment_pending");

    // Cart is locked while the payment is pending
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/cart/items",
        token,
        None,
        Some(json!({ "product_id": "2" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/cart/checkout",
        token,
        None,
        Some(json!({ "payment_method": "cash", "cash_received": 50_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(
        error_code(&body),
        u64::from(ErrorCode::PaymentInsufficientAmount.code())
    );

    let (status, transaction) = send(
        &app,
        Method::POST,
        "/api/cart/checkout",
        token,
        None,
        Some(json!({ "payment_method": "cash", "cash_received": 100_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transaction["total"], 64_680);
    assert_eq!(transaction["payment"]["change"], 35_320);
    assert_eq!(transaction["customer_name"], "Pelanggan Umum");

    let (status, product) = send(&app, Method::GET, "/api/products/1", token, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["stock"], 48);

    let (status, history) = send(&app, Method::GET, "/api/transactions", token, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["id"], transaction["id"]);

    let (status, cart) = send(&app, Method::GET, "/api/cart", token, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["phase"], "committed");
    assert_eq!(cart["cart"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_status_update_to_inactive_drops_carts() {
    let app = app().await;
    let admin = login(&app, "superadmin", "admin").await;
    let cashier = login(&app, "kasir1", "123").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/cart/items",
        Some(&cashier),
        None,
        Some(json!({ "product_id": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for tenant_status in ["inactive", "active"] {
        let (status, tenant) = send(
            &app,
            Method::PUT,
            "/api/tenants/v1",
            Some(&admin),
            None,
            Some(json!({ "status": tenant_status })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tenant["status"], tenant_status);
    }

    let (status, cart) = send(&app, Method::GET, "/api/cart", Some(&cashier), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["cart"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_owner_reports_and_cashier_reset_denied() {
    let app = app().await;
    let owner = login(&app, "owner1", "123").await;
    let cashier = login(&app, "kasir1", "123").await;

    let (status, summary) = send(
        &app,
        Method::GET,
        "/api/reports/summary",
        Some(&owner),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["transaction_count"], 1);
    assert_eq!(summary["total_sales"], 101_640);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/reports/summary?from=2024-03-11&to=2024-03-10",
        Some(&owner),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/transactions",
        Some(&cashier),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/transactions",
        Some(&owner),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);
}
