//! Integration tests for the `netatmo` CLI binary.
//!
//! Argument parsing and config errors run offline; the rest talk to a
//! wiremock server standing in for the Netatmo API.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// The `netatmo` binary with config directories pointed at a
/// nonexistent path.
fn netatmo_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("netatmo");
    cmd.env("HOME", "/tmp/netatmo-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/netatmo-cli-test-nonexistent")
        .env_remove("NETATMO_HUB_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn config_for(server: &MockServer) -> NamedTempFile {
    config_file(&format!(
        r#"
        [netatmo]
        api_key = "client-id"
        secret_key = "client-secret"
        username = "user@example.com"
        password = "hunter2"
        base_url = "{}"
        timeout = 5
        "#,
        server.uri()
    ))
}

async fn mock_account(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "expires_in": 10_800,
            "scope": ["read_camera", "access_camera"]
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/gethomedata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "body": {
                "homes": [{
                    "id": "home-1",
                    "name": "Maison",
                    "cameras": [
                        {
                            "id": "cam-a",
                            "name": "Salon",
                            "type": "NACamera",
                            "modules": [{ "id": "tag-1", "name": "Porte", "type": "NACamDoorTag" }]
                        },
                        { "id": "cam-b", "name": "Jardin", "type": "NOC" }
                    ],
                    "events": [
                        { "id": "e1", "type": "movement", "time": 1_600_000_000, "camera_id": "cam-a" }
                    ]
                }]
            }
        })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    netatmo_cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_commands() {
    netatmo_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("cameras")
            .and(predicate::str::contains("modules"))
            .and(predicate::str::contains("events"))
            .and(predicate::str::contains("check")),
    );
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn missing_config_file() {
    netatmo_cmd()
        .args(["--config", "/tmp/netatmo-cli-test-nonexistent/config.toml", "check"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn missing_password_is_rejected() {
    let file = config_file(
        r#"
        [netatmo]
        api_key = "client-id"
        secret_key = "client-secret"
        username = "user@example.com"
        "#,
    );

    netatmo_cmd()
        .arg("--config")
        .arg(file.path())
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("netatmo.password"));
}

// ── Against a mock API ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn check_reports_session_and_platforms() {
    let server = MockServer::start().await;
    mock_account(&server).await;
    let file = config_for(&server);

    netatmo_cmd()
        .arg("-c")
        .arg(file.path())
        .arg("check")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("authenticated as user@example.com")
                .and(predicate::str::contains("scope: read_camera access_camera"))
                .and(predicate::str::contains("platform: binary_sensor")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&server)
        .await;
    let file = config_for(&server);

    netatmo_cmd()
        .arg("-c")
        .arg(file.path())
        .arg("cameras")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unable to connect to Netatmo API"));
}

#[tokio::test(flavor = "multi_thread")]
async fn cameras_and_modules() {
    let server = MockServer::start().await;
    mock_account(&server).await;
    let file = config_for(&server);

    netatmo_cmd()
        .arg("-c")
        .arg(file.path())
        .args(["cameras", "--home", "Maison"])
        .assert()
        .success()
        .stdout("Salon\nJardin\n");

    netatmo_cmd()
        .arg("-c")
        .arg(file.path())
        .args(["modules", "Salon"])
        .assert()
        .success()
        .stdout("Porte\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_names_exit_with_not_found() {
    let server = MockServer::start().await;
    mock_account(&server).await;
    let file = config_for(&server);

    netatmo_cmd()
        .arg("-c")
        .arg(file.path())
        .args(["modules", "Garage"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Garage"));

    netatmo_cmd()
        .arg("-c")
        .arg(file.path())
        .args(["cameras", "--home", "Bureau"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Bureau"));
}

#[tokio::test(flavor = "multi_thread")]
async fn events_show_last_event_per_camera() {
    let server = MockServer::start().await;
    mock_account(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/geteventsuntil"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "body": {
                "events_list": [
                    { "id": "e2", "type": "person", "time": 1_600_000_600, "camera_id": "cam-a" }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let file = config_for(&server);

    netatmo_cmd()
        .arg("-c")
        .arg(file.path())
        .args(["events", "--camera", "Salon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salon\t2020-09-13T12:36:40+00:00\tperson"));
}
