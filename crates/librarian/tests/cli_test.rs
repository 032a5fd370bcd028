//! Integration tests for the `librarian` CLI binary.
//!
//! Argument parsing, help, completions and config handling run offline;
//! the auth and request flows run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `librarian` binary with env isolation.
///
/// Clears `LIBRARIAN_*` env vars and points config + data directories at
/// `home` so tests never touch the user's real configuration or session.
fn librarian_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("librarian");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("LIBRARIAN_PROFILE")
        .env_remove("LIBRARIAN_SERVER")
        .env_remove("LIBRARIAN_BASE_HOST")
        .env_remove("LIBRARIAN_OUTPUT")
        .env_remove("LIBRARIAN_INSECURE")
        .env_remove("LIBRARIAN_TIMEOUT")
        .env_remove("LIBRARIAN_TOKEN")
        .env_remove("LIBRARIAN_DEFAULT_PROFILE");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "data": data }))
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = librarian_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    librarian_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("auth")
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("post"))
                .and(predicate::str::contains("invite"))
                .and(predicate::str::contains("config")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    librarian_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("librarian"));
}

#[test]
fn test_auth_subcommands_exist() {
    let home = tempfile::tempdir().unwrap();
    librarian_cmd(home.path())
        .args(["auth", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("login")
                .and(predicate::str::contains("status"))
                .and(predicate::str::contains("logout")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    librarian_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    librarian_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = librarian_cmd(home.path())
        .args(["--output", "invalid", "get", "items"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_get_without_server_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    librarian_cmd(home.path())
        .args(["get", "items"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No server configured"));
}

#[test]
fn test_unknown_profile_is_reported() {
    let home = tempfile::tempdir().unwrap();
    librarian_cmd(home.path())
        .args(["--profile", "work", "get", "items"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Profile 'work' not found"));
}

#[test]
fn test_unreachable_server_is_connection_error() {
    let home = tempfile::tempdir().unwrap();
    librarian_cmd(home.path())
        .args(["--base-host", "http://127.0.0.1:9", "--timeout", "5", "get", "items"])
        .assert()
        .code(7);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    let home = tempfile::tempdir().unwrap();
    librarian_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_set_persists_to_profile() {
    let home = tempfile::tempdir().unwrap();
    librarian_cmd(home.path())
        .args(["config", "set", "base_host", "http://localhost:3000"])
        .assert()
        .success();
    librarian_cmd(home.path())
        .args(["config", "set", "session_storage", "memory"])
        .assert()
        .success();

    librarian_cmd(home.path())
        .args(["--output", "json", "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("http://localhost:3000")
                .and(predicate::str::contains("\"memory\"")),
        );
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    librarian_cmd(home.path())
        .args(["config", "set", "color", "red"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn test_config_use_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    librarian_cmd(home.path())
        .args(["config", "use", "nope"])
        .assert()
        .code(2);
}

// ── Against a server ────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_session_for_later_requests() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "token": "t0ken" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(query_param("page", "2"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ok(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&server)
        .await;

    librarian_cmd(home.path())
        .args(["--base-host", &server.uri(), "auth", "login", "--token", "t0ken"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged in"));

    librarian_cmd(home.path())
        .args([
            "--base-host",
            &server.uri(),
            "-o",
            "json-compact",
            "get",
            "/items",
            "-Q",
            "page=2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"[{"id":1}]"#));

    librarian_cmd(home.path())
        .args(["--base-host", &server.uri(), "auth", "logout"])
        .assert()
        .success();

    let session = home.path().join("data").join("librarian").join("session-default.json");
    assert!(!session.exists(), "logout should remove the session file");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "ok": false, "error": "Invalid token" })),
        )
        .mount(&server)
        .await;

    librarian_cmd(home.path())
        .args(["--base-host", &server.uri(), "auth", "login", "--token", "nope"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_reports_session() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    librarian_cmd(home.path())
        .args(["--base-host", &server.uri(), "-o", "plain", "auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_error_message_is_shown() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/things"))
        .and(body_json(json!({ "name": "x" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ok": false, "error": "name taken" })),
        )
        .mount(&server)
        .await;

    librarian_cmd(home.path())
        .args(["--base-host", &server.uri(), "post", "things", "-d", r#"{"name":"x"}"#])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("name taken"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invite_show_plain_prints_token() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/invite"))
        .and(query_param("token", "inv-1"))
        .respond_with(ok(json!({
            "token": "inv-1",
            "option": { "sharedLibraries": { "all": true, "libraryIds": [] } }
        })))
        .mount(&server)
        .await;

    librarian_cmd(home.path())
        .args(["--base-host", &server.uri(), "invite", "show", "inv-1"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("inv-1")
                .and(predicate::str::contains("Libraries:      all"))
                .and(predicate::str::contains("never")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invite_create_sends_roles() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/invite/create"))
        .and(body_json(json!({
            "labelsAllow": null,
            "labelsExclude": null,
            "sharedLibraries": { "all": true, "libraryIds": [] },
            "expire_at": null,
            "roles": ["FILE_DOWNLOAD"]
        })))
        .respond_with(ok(json!({
            "token": "inv-2",
            "option": { "roles": ["FILE_DOWNLOAD"] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    librarian_cmd(home.path())
        .args([
            "--base-host",
            &server.uri(),
            "-o",
            "plain",
            "invite",
            "create",
            "--all-libraries",
            "--role",
            "FILE_DOWNLOAD",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("inv-2"));
}
