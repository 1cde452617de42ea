#![allow(clippy::unwrap_used)]
// Session store, route gate, and controller flows against a mocked backend.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockroom_core::model::{MovementType, Role, StockDraft};
use stockroom_core::route::{Route, landing};
use stockroom_core::{ClientConfig, CoreError, Credentials, LoginOutcome, SessionState, Stockroom};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(Url::parse(&server.uri()).unwrap())
}

async fn setup() -> (MockServer, Stockroom) {
    let server = MockServer::start().await;
    let stockroom = Stockroom::new(config(&server)).unwrap();
    (server, stockroom)
}

fn user_json(role: &str) -> serde_json::Value {
    json!({"id": 1, "name": "Ada", "email": "ada@example.com", "role": role})
}

fn secret(s: &str) -> SecretString {
    s.to_string().into()
}

fn product_json(id: i64, quantity: i32) -> serde_json::Value {
    json!({
        "id": id, "name": "Bolt", "category": "Hardware", "supplier": null,
        "quantity": quantity, "price": 2.5, "warehouseLocation": "A1", "reorderLevel": 5
    })
}

async fn mount_login(server: &MockServer, role: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(role)))
        .mount(server)
        .await;
}

async fn login(stockroom: &Stockroom) {
    let outcome = stockroom
        .session()
        .login("ada@example.com", &secret("pw"))
        .await;
    assert!(outcome.is_success(), "login failed: {outcome:?}");
}

// ── Restore ─────────────────────────────────────────────────────────

#[tokio::test]
async fn restore_with_live_session_authenticates() {
    let (server, stockroom) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("STAFF")))
        .mount(&server)
        .await;

    let state = stockroom.session().restore().await;
    assert_eq!(state.role(), Some(Role::Staff));
    assert_eq!(landing(&state, Route::Root), Some(Route::Dashboard));
}

#[tokio::test]
async fn restore_without_session_is_anonymous() {
    let (server, stockroom) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert_eq!(stockroom.session().restore().await, SessionState::Anonymous);
}

#[tokio::test]
async fn restore_fails_closed_on_server_error() {
    let (server, stockroom) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert_eq!(stockroom.session().restore().await, SessionState::Anonymous);
}

#[tokio::test]
async fn restore_fails_closed_when_unreachable() {
    let config = ClientConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
    let stockroom = Stockroom::new(config).unwrap();
    assert_eq!(stockroom.session().restore().await, SessionState::Anonymous);
}

// ── Login / logout ──────────────────────────────────────────────────

#[tokio::test]
async fn login_success_authenticates() {
    let (server, stockroom) = setup().await;
    mount_login(&server, "ADMIN").await;

    login(&stockroom).await;
    assert_eq!(stockroom.session().state().role(), Some(Role::Admin));
}

#[tokio::test]
async fn login_failure_keeps_state_and_reports_message() {
    let (server, stockroom) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let outcome = stockroom
        .session()
        .login("ada@example.com", &secret("wrong"))
        .await;
    assert!(!outcome.is_success());
    assert_eq!(outcome.message().as_deref(), Some("Invalid credentials"));
    assert_eq!(stockroom.session().state(), SessionState::Restoring);
}

#[tokio::test]
async fn blank_login_makes_no_request() {
    let (server, stockroom) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("ADMIN")))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = stockroom.session().login("", &secret("password")).await;
    assert!(matches!(outcome, LoginOutcome::Failure(CoreError::Validation { .. })));
}

#[tokio::test]
async fn logout_is_best_effort() {
    let (server, stockroom) = setup().await;
    mount_login(&server, "STAFF").await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    login(&stockroom).await;
    stockroom.session().logout().await;
    assert_eq!(stockroom.session().state(), SessionState::Anonymous);
}

// ── Gating ──────────────────────────────────────────────────────────

#[tokio::test]
async fn staff_cannot_fetch_reports() {
    let (server, stockroom) = setup().await;
    mount_login(&server, "STAFF").await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    login(&stockroom).await;
    let err = stockroom.reports().await.unwrap_err();
    assert!(matches!(err, CoreError::Forbidden { .. }), "got {err:?}");
}

#[tokio::test]
async fn admin_fetches_reports() {
    let (server, stockroom) = setup().await;
    mount_login(&server, "ADMIN").await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stockValuation": 125.5, "fastMoving": [], "slowMoving": [], "turnoverRate": 3.2
        })))
        .expect(1)
        .mount(&server)
        .await;

    login(&stockroom).await;
    let report = stockroom.reports().await.unwrap();
    assert!((report.turnover_rate - 3.2).abs() < f64::EPSILON);
}

#[tokio::test]
async fn expired_session_during_load_sends_gate_to_login() {
    let (server, stockroom) = setup().await;
    mount_login(&server, "STAFF").await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/suppliers"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    login(&stockroom).await;
    let products = stockroom.products();
    products.load().await;

    assert_eq!(products.state().error, None);
    let state = stockroom.session().state();
    assert_eq!(state, SessionState::Anonymous);
    assert_eq!(landing(&state, Route::Products), Some(Route::Login));
}

// ── Stock movements ─────────────────────────────────────────────────

#[tokio::test]
async fn stock_out_is_reflected_after_reload() {
    let (server, stockroom) = setup().await;
    mount_login(&server, "STAFF").await;

    // Product list before and after the movement.
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product_json(7, 10)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product_json(7, 7)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/inventory/update-stock"))
        .and(body_json(json!({"productId": 7, "quantity": 3, "type": "OUT", "notes": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "product": {"id": 7, "name": "Bolt"}, "type": "OUT", "quantity": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    login(&stockroom).await;
    let logs = stockroom.inventory_logs();
    logs.load().await;
    assert_eq!(logs.state().lookups[0].quantity, 10);

    logs.set_form(StockDraft {
        product_id: Some(7),
        movement: MovementType::Out,
        quantity: 3,
        notes: String::new(),
    });
    logs.submit().await.unwrap();

    let state = logs.state();
    assert_eq!(state.lookups[0].quantity, 7);
    assert_eq!(state.form, StockDraft::default());
}

#[tokio::test]
async fn insufficient_stock_surfaces_backend_message() {
    let (server, stockroom) = setup().await;
    mount_login(&server, "STAFF").await;
    Mock::given(method("POST"))
        .and(path("/api/inventory/update-stock"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Insufficient stock"})),
        )
        .mount(&server)
        .await;

    login(&stockroom).await;
    let logs = stockroom.inventory_logs();
    logs.set_form(StockDraft {
        product_id: Some(7),
        movement: MovementType::Out,
        quantity: 300,
        notes: String::new(),
    });
    logs.submit().await.unwrap_err();
    assert_eq!(logs.state().error.as_deref(), Some("Insufficient stock"));
    assert_eq!(logs.state().form.quantity, 300);
}

#[tokio::test]
async fn inventory_logs_cannot_be_deleted() {
    let (_server, stockroom) = setup().await;
    let logs = stockroom.inventory_logs();
    logs.request_delete(1);
    let err = logs.confirm_delete().await.unwrap_err();
    assert!(matches!(err, CoreError::Unsupported { .. }));
}

// ── One-shot ────────────────────────────────────────────────────────

#[tokio::test]
async fn oneshot_logs_in_runs_and_logs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    mount_login(&server, "STAFF").await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Logged out"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cfg = config(&server);
    cfg.credentials = Some(Credentials {
        email: "ada@example.com".into(),
        password: secret("pw"),
    });

    let role = Stockroom::oneshot(cfg, |s| async move {
        Ok(s.session().state().role())
    })
    .await
    .unwrap();
    assert_eq!(role, Some(Role::Staff));
}

#[tokio::test]
async fn oneshot_without_credentials_is_a_config_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = Stockroom::oneshot(config(&server), |_| async { Ok(()) })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Config { .. }));
}
