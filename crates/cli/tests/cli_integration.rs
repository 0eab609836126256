//! CLI integration tests for the `gatepass` binary.
//!
//! Uses `assert_cmd` to spawn the binary against a fake backend served
//! by axum on a background thread, and checks exit codes, stdout, and
//! stderr.

use std::net::SocketAddr;
use std::sync::mpsc;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use predicates::prelude::*;
use serde_json::{json, Value};

// ──────────────────────────────────────────────
// Fake backend
// ──────────────────────────────────────────────

async fn validate(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let code = body.get("code").and_then(|c| c.as_str()).unwrap_or_default();
    verdict_for(code)
}

async fn validate_qr(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let raw = body.get("qr_data").and_then(|c| c.as_str()).unwrap_or_default();
    verdict_for(raw)
}

fn verdict_for(code: &str) -> (StatusCode, Json<Value>) {
    match code {
        "XY4P9" | "gatepass://XY4P9 signed" => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "result": "granted",
                    "reason": "Valid code",
                    "code": code,
                    "accessCodeId": "ac-1",
                    "residentId": "res-1",
                    "validated_at": "2026-10-19T08:00:00Z",
                    "visitorName": "Ada"
                }
            })),
        ),
        "00000" => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "result": "denied",
                    "reason": "Code expired",
                    "code": "00000",
                    "accessCodeId": "ac-0",
                    "residentId": "res-1",
                    "validated_at": "2026-10-19T08:01:00Z"
                }
            })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "error": {"message": "Access code not found", "code": "NOT_FOUND"}
            })),
        ),
    }
}

async fn recent() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {"validations": [
            {"id": "2", "code": "00000", "result": "denied", "visitor_name": "Cy",
             "resident_name": "Di", "home": "Plot 9", "validated_at": "t2"},
            {"id": "1", "code": "XY4P9", "result": "granted", "visitor_name": "Ada",
             "resident_name": "Bo", "home": "Plot 4", "validated_at": "t1"}
        ]}
    }))
}

/// Serve the fake backend on its own runtime thread; returns its address.
fn start_backend() -> SocketAddr {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("backend runtime");
        rt.block_on(async move {
            let app = Router::new()
                .route("/api/security/validate", post(validate))
                .route("/api/security/validate-qr", post(validate_qr))
                .route("/api/security/recent-validations", get(recent));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind backend");
            tx.send(listener.local_addr().expect("backend addr"))
                .expect("send addr");
            axum::serve(listener, app).await.expect("serve backend");
        });
    });
    rx.recv().expect("backend address")
}

/// An address with nothing listening on it.
fn dead_address() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Helper: the `gatepass` binary with a clean GATEPASS_* environment.
fn gatepass() -> Command {
    let mut cmd = cargo_bin_cmd!("gatepass");
    for key in [
        "GATEPASS_CONFIG",
        "GATEPASS_API_URL",
        "GATEPASS_SECURITY_PATH",
        "GATEPASS_AUTH_TOKEN",
        "GATEPASS_TIMEOUT_SECS",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

fn base_url(addr: SocketAddr) -> String {
    format!("http://{}/api", addr)
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    gatepass()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Checkpoint access validation client",
        ));
}

#[test]
fn version_exits_0() {
    gatepass()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gatepass"));
}

// ──────────────────────────────────────────────
// 2. One-shot validation
// ──────────────────────────────────────────────

#[test]
fn granted_code_exits_0() {
    let addr = start_backend();
    gatepass()
        .args(["--base-url", &base_url(addr), "validate", "XY4P9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ACCESS GRANTED"))
        .stdout(predicate::str::contains("code:      XY4P9"))
        .stdout(predicate::str::contains("visitor:   Ada"));
}

#[test]
fn denied_code_exits_2_with_reason() {
    let addr = start_backend();
    gatepass()
        .args(["--base-url", &base_url(addr), "validate", "00000"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("ACCESS DENIED: Code expired"));
}

#[test]
fn unknown_code_exits_1_with_backend_message() {
    let addr = start_backend();
    gatepass()
        .args(["--base-url", &base_url(addr), "validate", "ZZZZZ"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "VALIDATION ERROR: Access code not found",
        ));
}

#[test]
fn scan_forwards_payload_verbatim() {
    let addr = start_backend();
    gatepass()
        .args([
            "--base-url",
            &base_url(addr),
            "scan",
            "gatepass://XY4P9 signed",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("code:      gatepass://XY4P9 signed"));
}

#[test]
fn unreachable_backend_is_network_error() {
    gatepass()
        .args(["--base-url", &base_url(dead_address()), "scan", "XY4P9"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "VALIDATION ERROR: A network error occurred.",
        ));
}

#[test]
fn json_output_is_snapshot() {
    let addr = start_backend();
    let output = gatepass()
        .args([
            "--output",
            "json",
            "--base-url",
            &base_url(addr),
            "validate",
            "00000",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let snap: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snap["state"], "denied");
    assert_eq!(snap["errorMessage"], "Code expired");
    assert_eq!(snap["outcome"]["code"], "00000");
    assert_eq!(snap["history"].as_array().unwrap().len(), 2);
    assert_eq!(snap["history"][1]["status"], "GRANTED");
}

// ──────────────────────────────────────────────
// 3. History
// ──────────────────────────────────────────────

#[test]
fn history_prints_table() {
    let addr = start_backend();
    gatepass()
        .args(["--base-url", &base_url(addr), "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DENIED   00000 Cy / Di / Plot 9 / t2"))
        .stdout(predicate::str::contains("GRANTED  XY4P9 Ada / Bo / Plot 4 / t1"));
}

#[test]
fn history_json_uses_client_field_names() {
    let addr = start_backend();
    let output = gatepass()
        .args(["--output", "json", "--base-url", &base_url(addr), "history"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let page: Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = page["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["visitorName"], "Cy");
    assert_eq!(entries[0]["residentName"], "Di");
    assert_eq!(entries[0]["status"], "DENIED");
}

#[test]
fn history_unreachable_exits_1() {
    gatepass()
        .args(["--base-url", &base_url(dead_address()), "history"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: A network error occurred."));
}

// ──────────────────────────────────────────────
// 4. Configuration
// ──────────────────────────────────────────────

#[test]
fn invalid_base_url_exits_1() {
    gatepass()
        .args(["--base-url", "gate.example.com", "history"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid value for base_url"));
}

#[test]
fn config_file_supplies_base_url() {
    let addr = start_backend();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gatepass.toml");
    std::fs::write(
        &path,
        format!("[gateway]\nbase_url = \"{}\"\n", base_url(addr)),
    )
    .unwrap();

    gatepass()
        .arg("--config")
        .arg(&path)
        .args(["validate", "XY4P9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ACCESS GRANTED"));
}

#[test]
fn env_var_supplies_base_url() {
    let addr = start_backend();
    gatepass()
        .env("GATEPASS_API_URL", base_url(addr))
        .args(["validate", "00000"])
        .assert()
        .code(2);
}

#[test]
fn missing_config_file_exits_1() {
    gatepass()
        .args(["--config", "/nonexistent/gatepass.toml", "history"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not read"));
}

// ──────────────────────────────────────────────
// 5. Console
// ──────────────────────────────────────────────

#[test]
fn console_runs_a_shift() {
    let addr = start_backend();
    gatepass()
        .args(["--base-url", &base_url(addr), "console"])
        .write_stdin("XY4P9\ncode 00000\nqr gatepass://XY4P9 signed\nreset\nfly away\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gatepass checkpoint console"))
        .stdout(predicate::str::contains("GRANTED  XY4P9 Ada / Bo / Plot 4 / t1"))
        .stdout(predicate::str::contains("ACCESS GRANTED"))
        .stdout(predicate::str::contains("ACCESS DENIED: Code expired"))
        .stdout(predicate::str::contains("code:      gatepass://XY4P9 signed"))
        .stdout(predicate::str::contains("Ready."))
        .stderr(predicate::str::contains("unknown command: fly"));
}

#[test]
fn console_ends_at_eof() {
    gatepass()
        .args(["--base-url", &base_url(dead_address()), "console"])
        .write_stdin("00000\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No recent validations."))
        .stdout(predicate::str::contains(
            "VALIDATION ERROR: A network error occurred.",
        ));
}
