//! Integration tests for the `stockroom` CLI binary.
//!
//! Argument parsing, help output, shell completions, and error handling run
//! without a backend. The session-bound commands run against a wiremock
//! server standing in for the inventory API.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `stockroom` binary with env isolation.
///
/// Clears all `STOCKROOM_*` env vars and points the config file at a
/// nonexistent path so tests never touch the user's real configuration.
fn stockroom_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("stockroom");
    cmd.env("HOME", "/tmp/stockroom-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/stockroom-cli-test-nonexistent")
        .env(
            "STOCKROOM_CONFIG",
            "/tmp/stockroom-cli-test-nonexistent/config.toml",
        )
        .env_remove("STOCKROOM_PROFILE")
        .env_remove("STOCKROOM_SERVER")
        .env_remove("STOCKROOM_EMAIL")
        .env_remove("STOCKROOM_PASSWORD")
        .env_remove("STOCKROOM_OUTPUT")
        .env_remove("STOCKROOM_INSECURE")
        .env_remove("STOCKROOM_TIMEOUT");
    cmd
}

/// A command already pointed at `server` with working credentials.
fn backend_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = stockroom_cmd();
    cmd.env("STOCKROOM_SERVER", server.uri())
        .env("STOCKROOM_EMAIL", "ada@example.com")
        .env("STOCKROOM_PASSWORD", "pw");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the (blocking) binary off the runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

async fn mount_login(server: &MockServer, role: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "name": "Ada", "email": "ada@example.com", "role": role
        })))
        .mount(server)
        .await;
}

fn product_json(id: i64, name: &str, quantity: i32) -> serde_json::Value {
    json!({
        "id": id, "name": name, "category": "Hardware", "supplier": null,
        "quantity": quantity, "price": 2.5, "warehouseLocation": "A1", "reorderLevel": 5
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = stockroom_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    stockroom_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("products")
            .and(predicate::str::contains("suppliers"))
            .and(predicate::str::contains("logs"))
            .and(predicate::str::contains("reports")),
    );
}

#[test]
fn test_version_flag() {
    stockroom_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stockroom"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    stockroom_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    stockroom_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = stockroom_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("invalid") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_products_list_without_config() {
    stockroom_cmd()
        .args(["products", "list"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("server")),
        );
}

#[test]
fn test_config_show_no_config() {
    // Falls back to the default config when the file is missing.
    stockroom_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_invalid_movement_type() {
    let output = stockroom_cmd()
        .args(["logs", "stock", "1", "--type", "sideways", "--quantity", "3"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("possible values") || text.contains("invalid value"), "{text}");
}

#[test]
fn test_remote_requires_search() {
    let output = stockroom_cmd()
        .args(["suppliers", "list", "--remote"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_products_subcommands_exist() {
    stockroom_cmd()
        .args(["products", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("update"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn test_reports_subcommands_exist() {
    stockroom_cmd()
        .args(["reports", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show").and(predicate::str::contains("export")));
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_products_list_plain_filters_locally() {
    let server = MockServer::start().await;
    mount_login(&server, "STAFF").await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json(1, "Bolt", 40),
            product_json(2, "Hinge", 2),
            product_json(3, "Bolt cutter", 9),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/suppliers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut cmd = backend_cmd(&server);
    cmd.args(["-o", "plain", "products", "list", "--search", "BOLT"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1\n3");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bad_credentials_exit_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let mut cmd = backend_cmd(&server);
    cmd.arg("whoami");
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Invalid credentials"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_staff_cannot_view_reports() {
    let server = MockServer::start().await;
    mount_login(&server, "STAFF").await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = backend_cmd(&server);
    cmd.args(["reports", "show"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(5));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stock_out_reports_backend_message() {
    let server = MockServer::start().await;
    mount_login(&server, "STAFF").await;
    Mock::given(method("POST"))
        .and(path("/api/inventory/update-stock"))
        .and(body_json(json!({
            "productId": 2, "quantity": 50, "type": "OUT", "notes": null
        })))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Insufficient stock"})),
        )
        .mount(&server)
        .await;

    let mut cmd = backend_cmd(&server);
    cmd.args(["logs", "stock", "2", "--type", "out", "--quantity", "50"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Insufficient stock"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_record_log_posts_bare_entry() {
    let server = MockServer::start().await;
    mount_login(&server, "STAFF").await;
    Mock::given(method("POST"))
        .and(path("/api/inventory/logs"))
        .and(body_json(json!({
            "product": {"id": 2}, "type": "IN", "quantity": 4, "notes": "cycle count"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 31, "product": {"id": 2, "name": "Hinge"}, "type": "IN",
            "quantity": 4, "notes": "cycle count"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/inventory/update-stock"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = backend_cmd(&server);
    cmd.args([
        "logs", "record", "2", "--type", "in", "--quantity", "4", "--notes", "cycle count",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("entry 31"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_yes_is_refused_off_terminal() {
    let server = MockServer::start().await;
    mount_login(&server, "ADMIN").await;
    Mock::given(method("DELETE"))
        .and(path("/api/products/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = backend_cmd(&server);
    cmd.args(["products", "delete", "7"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_seed_demo_tolerates_existing_accounts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "Email already registered"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let mut cmd = stockroom_cmd();
    cmd.env("STOCKROOM_SERVER", server.uri()).arg("seed-demo");
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already registered"));
}
