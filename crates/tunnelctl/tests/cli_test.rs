//! Integration tests for the `tunnelctl` binary.
//!
//! Argument and usage checks run without a control plane; the end-to-end
//! tests point `--api-url` at a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCOUNT: &str = "acct-1";
const TUNNEL_ID: &str = "7b4f0c4e-3a0e-4c55-9f61-2d2c1c0b9a10";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `tunnelctl` binary with env isolation.
///
/// Clears every variable the CLI reads and points the config file at a
/// nonexistent path so tests never touch the user's real configuration.
fn tunnelctl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tunnelctl");
    cmd.env("HOME", "/tmp/tunnelctl-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/tunnelctl-test-nonexistent")
        .env("TUNNELCTL_CONFIG", "/tmp/tunnelctl-test-nonexistent/config.toml")
        .env_remove("TUNNELCTL_PROFILE")
        .env_remove("TUNNELCTL_API_URL")
        .env_remove("TUNNELCTL_ACCOUNT")
        .env_remove("TUNNELCTL_ZONE")
        .env_remove("TUNNELCTL_API_TOKEN")
        .env_remove("TUNNELCTL_TIMEOUT")
        .env_remove("TUNNEL_CRED_FILE")
        .env_remove("TUNNEL_LIST_SORT_BY")
        .env_remove("TUNNEL_LIST_INVERT_SORT")
        .env_remove("TUNNEL_INFO_SORT_BY")
        .env_remove("TUNNEL_INFO_INVERT_SORT")
        .env_remove("RUST_LOG");
    cmd
}

/// Like [`tunnelctl_cmd`], wired to a mock control plane.
fn remote_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = tunnelctl_cmd();
    cmd.args([
        "--api-url",
        &server.uri(),
        "--account",
        ACCOUNT,
        "--api-token",
        "test-token",
        "--color",
        "never",
    ]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok(result: &serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result,
    }))
}

fn web_tunnel() -> serde_json::Value {
    json!({
        "id": TUNNEL_ID,
        "name": "web",
        "created_at": "2024-03-01T10:00:00Z",
        "deleted_at": null,
        "connections": [
            { "colo_name": "LAX", "id": "0b3a7f7e-1111-4c55-9f61-2d2c1c0b9a10",
              "is_pending_reconnect": false, "origin_ip": "203.0.113.7",
              "opened_at": "2024-03-01T10:05:00Z" },
            { "colo_name": "LAX", "id": "0b3a7f7e-2222-4c55-9f61-2d2c1c0b9a10",
              "is_pending_reconnect": false, "origin_ip": "203.0.113.7",
              "opened_at": "2024-03-01T10:05:00Z" }
        ]
    })
}

/// Run a blocking command without stalling the mock server.
async fn run_blocking(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = tunnelctl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    tunnelctl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("create")
            .and(predicate::str::contains("list"))
            .and(predicate::str::contains("route"))
            .and(predicate::str::contains("cleanup")),
    );
}

#[test]
fn test_version_flag() {
    tunnelctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tunnelctl"));
}

#[test]
fn test_completions_bash() {
    tunnelctl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tunnelctl"));
}

#[test]
fn test_config_path_honors_override() {
    tunnelctl_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "/tmp/tunnelctl-test-nonexistent/config.toml",
        ));
}

// ── Usage errors (no control plane needed) ──────────────────────────

#[test]
fn test_unknown_output_format() {
    let output = tunnelctl_cmd()
        .args(["list", "--output", "xml"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Unknown output format 'xml'"));
}

#[test]
fn test_route_requires_type_and_tunnel() {
    let output = tunnelctl_cmd().args(["route", "dns"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("requires the first argument to be the route type"), "{text}");
    assert!(text.contains("tunnelctl route --help"), "{text}");
}

#[test]
fn test_route_rejects_unknown_type() {
    let output = tunnelctl_cmd()
        .args(["route", "ip", "web", "10.0.0.0/8"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("ip is not a recognized route type"));
}

#[test]
fn test_route_dns_arity() {
    let output = tunnelctl_cmd()
        .args(["route", "dns", "web", "a.example.com", "extra"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Expected 3 arguments, got 4"), "{text}");
    assert!(text.contains("tunnelctl route --help"), "{text}");
}

#[test]
fn test_route_empty_hostname_shows_usage_help() {
    let output = tunnelctl_cmd()
        .args(["route", "dns", "web", ""])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("The third argument should be the hostname"), "{text}");
    assert!(text.contains("tunnelctl route --help"), "{text}");
}

#[test]
fn test_route_lb_invalid_pool() {
    let output = tunnelctl_cmd()
        .args(["route", "lb", "web", "lb.example.com", "bad pool!"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("is not a valid pool name"));
}

#[test]
fn test_info_requires_exactly_one_tunnel() {
    let output = tunnelctl_cmd().args(["info", "a", "b"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("accepts exactly one argument"));
}

#[test]
fn test_create_requires_a_name() {
    let output = tunnelctl_cmd().arg("create").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("requires exactly 1 argument"));
}

#[test]
fn test_list_rejects_bad_when() {
    let output = tunnelctl_cmd()
        .args(["list", "--when", "yesterday"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("yesterday is not a valid RFC3339 time"));
}

#[test]
fn test_missing_account_is_reported() {
    let output = tunnelctl_cmd().arg("list").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("No account configured"));
}

// ── End-to-end against a mock control plane ─────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_renders_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{ACCOUNT}/tunnels")))
        .and(query_param("is_deleted", "false"))
        .respond_with(ok(&json!([web_tunnel()])))
        .mount(&server)
        .await;

    let mut cmd = remote_cmd(&server);
    cmd.arg("list");
    let output = run_blocking(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("You can obtain more detailed information"));
    assert!(stdout.contains("CONNECTIONS"));
    assert!(stdout.contains(TUNNEL_ID));
    assert!(stdout.contains("2xLAX"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{ACCOUNT}/tunnels")))
        .respond_with(ok(&json!([web_tunnel()])))
        .mount(&server)
        .await;

    let mut cmd = remote_cmd(&server);
    cmd.args(["list", "--output", "json"]);
    let output = run_blocking(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["name"], "web");
    assert_eq!(parsed[0]["id"], TUNNEL_ID);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{ACCOUNT}/tunnels")))
        .respond_with(ok(&json!([])))
        .mount(&server)
        .await;

    let mut cmd = remote_cmd(&server);
    cmd.arg("list");
    let output = run_blocking(cmd).await;

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("You have no tunnels"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_info_unknown_name_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{ACCOUNT}/tunnels")))
        .and(query_param("name", "ghost"))
        .respond_with(ok(&json!([])))
        .mount(&server)
        .await;

    let mut cmd = remote_cmd(&server);
    cmd.args(["info", "ghost"]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("ghost"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_auth_failure_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{ACCOUNT}/tunnels")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 10000, "message": "Authentication error" }],
            "messages": [],
            "result": null,
        })))
        .mount(&server)
        .await;

    let mut cmd = remote_cmd(&server);
    cmd.arg("list");
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}
