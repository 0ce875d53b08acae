//! Integration tests for the `myuplink` CLI binary.
//!
//! Argument parsing, help output, completions and error exits run without
//! any network. The end-to-end cases talk to a wiremock API.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `myuplink` binary with env isolation.
///
/// Clears the `MYUPLINK_*` variables the CLI reads and points config
/// directories at a nonexistent path so tests never touch a real setup.
fn myuplink_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("myuplink");
    cmd.env("HOME", "/tmp/myuplink-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/myuplink-cli-test-nonexistent")
        .env("MYUPLINK_PROFILES__DEFAULT__THROTTLE_DELAY", "0")
        .env_remove("MYUPLINK_PROFILE")
        .env_remove("MYUPLINK_BASE_URL")
        .env_remove("MYUPLINK_ACCESS_TOKEN")
        .env_remove("MYUPLINK_LANGUAGE")
        .env_remove("MYUPLINK_OUTPUT")
        .env_remove("MYUPLINK_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so wiremock keeps serving.
async fn run(args: Vec<String>) -> std::process::Output {
    tokio::task::spawn_blocking(move || myuplink_cmd().args(args).output().unwrap())
        .await
        .unwrap()
}

fn api_args(server: &MockServer, rest: &[&str]) -> Vec<String> {
    let mut args = vec![
        "--base-url".to_owned(),
        server.uri(),
        "--token".to_owned(),
        "test-token".to_owned(),
    ];
    args.extend(rest.iter().map(|s| (*s).to_owned()));
    args
}

async fn mount_account(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v2/systems/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1, "itemsPerPage": 99, "numItems": 1,
            "systems": [{
                "systemId": "sys-1",
                "name": "Home",
                "securityLevel": "admin",
                "hasAlarm": true,
                "devices": [{
                    "id": "dev-1",
                    "connectionState": "Connected",
                    "currentFwVersion": "9682R7",
                    "product": { "serialNumber": "0123", "name": "NIBE F730" }
                }]
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/systems/sys-1/subscriptions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "subscriptions": [{ "type": "manage" }] })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/systems/sys-1/smart-home-mode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "smartHomeMode": "Away" })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/systems/sys-1/notifications/active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1, "itemsPerPage": 99, "numItems": 1,
            "notifications": [{
                "id": "n1",
                "deviceId": "dev-1",
                "alarmNumber": 183,
                "header": "Defrosting",
                "status": "Active",
                "createdDatetime": "2026-01-02T03:04:05Z"
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/devices/dev-1/points"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "parameterId": "40004", "parameterName": "Outdoor temp.", "value": 7.5, "parameterUnit": "°C" },
            {
                "parameterId": "50004",
                "parameterName": "Temporary lux",
                "value": 0,
                "writable": true,
                "enumValues": [
                    { "value": "0", "text": "off" },
                    { "value": "1", "text": "on" }
                ]
            }
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/devices/dev-1/firmware-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deviceId": "dev-1",
            "currentFwVersion": "9682R7",
            "desiredFwVersion": "9682R7"
        })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = myuplink_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    myuplink_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("myUplink")
            .and(predicate::str::contains("parameters"))
            .and(predicate::str::contains("notifications"))
            .and(predicate::str::contains("mode")),
    );
}

#[test]
fn test_version_flag() {
    myuplink_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("myuplink"));
}

#[test]
fn test_completions_bash() {
    myuplink_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("myuplink"));
}

#[test]
fn test_invalid_mode_is_usage_error() {
    myuplink_cmd()
        .args(["--token", "t", "mode", "set", "sys-1", "party"])
        .assert()
        .code(2);
}

#[test]
fn test_config_path_prints_location() {
    myuplink_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Error exits ─────────────────────────────────────────────────────

#[test]
fn test_missing_token_exits_with_auth_code() {
    let output = myuplink_cmd().args(["systems", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("No access token"), "unexpected output:\n{text}");
}

#[test]
fn test_unknown_explicit_profile_is_not_found() {
    myuplink_cmd()
        .args(["--profile", "cabin", "--token", "t", "systems", "list"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("cabin"));
}

#[test]
fn test_write_without_yes_needs_terminal() {
    myuplink_cmd()
        .args([
            "--base-url",
            "http://127.0.0.1:9",
            "--token",
            "t",
            "set",
            "dev-1",
            "50004",
            "1",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("confirmation"));
}

#[test]
fn test_out_of_range_scan_interval_is_usage_error() {
    myuplink_cmd()
        .env("MYUPLINK_PROFILES__DEFAULT__SCAN_INTERVAL", "1")
        .args(["--token", "t", "systems", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("scan_interval"));
}

// ── End to end ──────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_systems_list_json() {
    let server = MockServer::start().await;
    mount_account(&server).await;

    let output = run(api_args(&server, &["-o", "json", "systems", "list"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["id"], "sys-1");
    assert_eq!(rows[0]["premium_manage"], true);
    assert_eq!(rows[0]["smart_home_mode"], "Away");
    assert_eq!(rows[0]["devices"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parameters_filters_writable() {
    let server = MockServer::start().await;
    mount_account(&server).await;

    let output = run(api_args(
        &server,
        &["-o", "json", "parameters", "dev-1", "--writable"],
    ))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], 50004);
    assert_eq!(rows[0]["platform"], "switch");
    assert_eq!(rows[0]["text"], "off");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_notifications_plain_lists_ids() {
    let server = MockServer::start().await;
    mount_account(&server).await;

    let output = run(api_args(&server, &["-o", "plain", "notifications"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "n1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_writes_after_refresh() {
    let server = MockServer::start().await;
    mount_account(&server).await;
    Mock::given(method("PATCH"))
        .and(path("/v2/devices/dev-1/points"))
        .and(body_json(json!({ "50004": "1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(api_args(&server, &["--yes", "set", "dev-1", "50004", "1"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("set to 1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_read_only_parameter_exits_with_permission_code() {
    let server = MockServer::start().await;
    mount_account(&server).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = run(api_args(&server, &["--yes", "set", "dev-1", "40004", "3"])).await;
    assert_eq!(output.status.code(), Some(5), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mode_set_rejected_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v2/systems/sys-1/smart-home-mode"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "payload": { "state": "failed" } })),
        )
        .mount(&server)
        .await;

    let output = run(api_args(&server, &["mode", "set", "sys-1", "vacation"])).await;
    assert_eq!(output.status.code(), Some(1), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("did not accept"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/systems/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let output = run(api_args(&server, &["systems"])).await;
    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}
