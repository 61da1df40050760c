//! End-to-end API flow over an in-process router.
//!
//! Uses a temporary work directory and drives the full axum app through
//! `tower::ServiceExt::oneshot`, no listening socket involved.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use ledger_server::api::build_app;
use ledger_server::auth::JwtConfig;
use ledger_server::core::{Config, ServerState};
use serde_json::{Value, json};
use tower::ServiceExt;

const MULTIPART_BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn test_config(work_dir: &std::path::Path) -> Config {
    Config {
        work_dir: work_dir.to_string_lossy().into_owned(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "integration-test-secret-0123456789abcdef".into(),
            expiration_minutes: 60,
            issuer: "ledger-server".into(),
            audience: "ledger-clients".into(),
        },
        environment: "test".into(),
        business_name: "Test Traders".into(),
        admin_password: "admin123".into(),
    }
}

async fn setup() -> (Router, ServerState, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path());
    let state = ServerState::initialize(&config).await;
    let app = build_app(&state).with_state(state.clone());
    (app, state, dir)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    body["token"].as_str().expect("token").to_string()
}

fn multipart_item_with_image(name: &str, price: &str, image: &[u8]) -> Body {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{name}\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"price\"\r\n\r\n{price}\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"photo.png\"\r\n\
             Content-Type: image/png\r\n\r\n",
            b = MULTIPART_BOUNDARY,
        )
        .as_bytes(),
    );
    body.extend_from_slice(image);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    Body::from(body)
}

fn multipart_request(uri: &str, token: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(body)
        .unwrap()
}

fn multipart_item_body(name: &str, price: &str) -> Body {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{name}\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"price\"\r\n\r\n{price}\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"description\"\r\n\r\nShop item\r\n\
         --{b}--\r\n",
        b = MULTIPART_BOUNDARY,
    );
    Body::from(body)
}

#[tokio::test]
async fn health_is_public() {
    let (app, _state, _dir) = setup().await;
    let response = app
        .oneshot(json_request("GET", "/api/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_require_token() {
    let (app, _state, _dir) = setup().await;
    let response = app
        .clone()
        .oneshot(json_request("GET", "/api/customers", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(json_request(
            "GET",
            "/api/customers",
            Some("not-a-real-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (app, _state, _dir) = setup().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "wrong" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_ledger_flow() {
    let (app, _state, _dir) = setup().await;
    let token = login(&app, "admin", "admin123").await;

    // Create a customer; the first one gets serial number 1
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/customers",
            Some(&token),
            Some(json!({ "name": "Priya Sharma", "mobile": "9876543210", "address": "456 Park Avenue" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let customer = read_json(response).await;
    assert_eq!(customer["serial_number"], 1);
    assert!(customer.get("hash_pass").is_none());
    let customer_id = customer["id"].as_i64().unwrap();

    // Duplicate mobile is a conflict
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/customers",
            Some(&token),
            Some(json!({ "name": "Someone Else", "mobile": "9876543210" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Bad mobile is rejected
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/customers",
            Some(&token),
            Some(json!({ "name": "Short Mobile", "mobile": "12345" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Create a catalog item (multipart, no image)
    let request = multipart_request(
        "/api/items",
        &token,
        multipart_item_body("Supari Mix", "120.50"),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let item = read_json(response).await;
    assert_eq!(item["name"], "Supari Mix");
    let item_id = item["id"].as_i64().unwrap();

    // Record a sale: 2 x 120.50 with a 100 advance
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/transactions",
            Some(&token),
            Some(json!({
                "customer_id": customer_id,
                "items": [
                    { "item_id": item_id, "name": "Supari Mix", "price": 120.50, "quantity": 2 }
                ],
                "advance_payment": 100.0
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let txn = read_json(response).await;
    assert_eq!(txn["total_amount"], 241.0);
    assert_eq!(txn["remaining_amount"], 141.0);

    // Item used in a transaction cannot be deleted
    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/items/{item_id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Customer with transactions cannot be deleted either
    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/customers/{customer_id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Dashboard aggregates pick up the sale
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/dashboard/stats",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = read_json(response).await;
    assert_eq!(stats["total_customers"], 1);
    assert_eq!(stats["total_items"], 1);
    assert_eq!(stats["today_transactions"], 1);
    assert_eq!(stats["monthly_revenue"], 241.0);
    assert_eq!(stats["recent_transactions"].as_array().unwrap().len(), 1);

    // Statement PDF downloads as an attachment
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            &format!("/api/reports/pdf?customer_id={customer_id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("statement-1-"));

    // WhatsApp statement carries a wa.me link for the customer's number
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/reports/whatsapp",
            Some(&token),
            Some(json!({ "customer_id": customer_id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let wa = read_json(response).await;
    assert!(wa["link"].as_str().unwrap().starts_with("https://wa.me/9876543210?text="));
    assert!(wa["message"].as_str().unwrap().contains("Test Traders"));
}

#[tokio::test]
async fn customer_portal_flow() {
    let (app, _state, _dir) = setup().await;
    let staff_token = login(&app, "admin", "admin123").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/customers",
            Some(&staff_token),
            Some(json!({ "name": "Rahul Verma", "mobile": "9000000001" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let customer = read_json(response).await;
    let customer_id = customer["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/transactions",
            Some(&staff_token),
            Some(json!({
                "customer_id": customer_id,
                "items": [],
                "advance_payment": 500.0
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Initial portal password is the mobile number
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/customer-login",
            None,
            Some(json!({ "serial_number": 1, "password": "9000000001" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["user"]["role"], "customer");
    assert_eq!(body["user"]["serial_number"], 1);
    let customer_token = body["token"].as_str().unwrap().to_string();

    // Portal data shows the customer's own account
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/portal/data",
            Some(&customer_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let data = read_json(response).await;
    assert_eq!(data["customer"]["name"], "Rahul Verma");
    assert_eq!(data["summary"]["total_transactions"], 1);
    assert_eq!(data["summary"]["outstanding_amount"], -500.0);

    // Portal statement downloads the customer's own PDF
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/portal/statement",
            Some(&customer_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");

    // Customer tokens cannot reach staff routes
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/customers",
            Some(&customer_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Staff tokens cannot reach the portal
    let response = app
        .oneshot(json_request(
            "GET",
            "/api/portal/data",
            Some(&staff_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn customer_search_by_serial_and_substring() {
    let (app, _state, _dir) = setup().await;
    let token = login(&app, "admin", "admin123").await;

    for (name, mobile) in [
        ("Amit Kumar", "9000000001"),
        ("Amita Devi", "9000000002"),
        ("Suresh Patel", "9111111111"),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/customers",
                Some(&token),
                Some(json!({ "name": name, "mobile": mobile })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Numeric query matches the serial number exactly
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/customers/search?query=2",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let results = read_json(response).await;
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["serial_number"], 2);
    assert_eq!(results[0]["name"], "Amita Devi");

    // Name substring matches both Amits, case-insensitively
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/customers/search?query=amit",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let results = read_json(response).await;
    assert_eq!(results.as_array().unwrap().len(), 2);

    // Digits are always a serial lookup, never a mobile substring
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/customers/search?query=9111",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    let results = read_json(response).await;
    assert!(results.as_array().unwrap().is_empty());

    // Blank query is rejected
    let response = app
        .oneshot(json_request(
            "GET",
            "/api/customers/search?query=",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_role_staff_cannot_use_admin_routes() {
    let (app, state, _dir) = setup().await;

    ledger_server::db::repository::staff::create(
        state.get_pool(),
        "clerk",
        "Clerk",
        "user",
        "clerk123",
    )
    .await
    .expect("create clerk");

    let token = login(&app, "clerk", "clerk123").await;

    // Staff routes are open to the user role
    let response = app
        .clone()
        .oneshot(json_request("GET", "/api/customers", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Item management is admin only
    let request = multipart_request(
        "/api/items",
        &token,
        multipart_item_body("Supari Mix", "120.50"),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // So are customer deletion and reports
    let response = app
        .clone()
        .oneshot(json_request("DELETE", "/api/customers/1", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(json_request(
            "GET",
            "/api/reports/customer?customer_id=1",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn image_size_limit_governs_uploads() {
    let (app, _state, _dir) = setup().await;
    let token = login(&app, "admin", "admin123").await;

    // 3MB is above axum's default body limit but within the image ceiling
    let request = multipart_request(
        "/api/items",
        &token,
        multipart_item_with_image("With Photo", "50", &vec![0u8; 3 * 1024 * 1024]),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let item = read_json(response).await;
    assert!(item["image"].as_str().unwrap().starts_with("items/"));

    // 6MB exceeds the ceiling and is rejected with the image-size message
    let request = multipart_request(
        "/api/items",
        &token,
        multipart_item_with_image("Too Big", "60", &vec![0u8; 6 * 1024 * 1024]),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("Image too large"));
}

#[tokio::test]
async fn report_for_unknown_customer_is_not_found() {
    let (app, _state, _dir) = setup().await;
    let token = login(&app, "admin", "admin123").await;

    let response = app
        .oneshot(json_request(
            "GET",
            "/api/reports/customer?customer_id=1",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
