#![allow(clippy::unwrap_used)]
// Full-sequence tests for the `Appliance` facade: session bracketing,
// the shutdown sequence, escalation policy, and the bundle batch.

use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use synohalt_api::DsmClient;
use synohalt_core::{Appliance, ApplianceConfig, BatchAction, ShutdownMethod, ShutdownVia};

// ── Helpers ─────────────────────────────────────────────────────────

fn config() -> ApplianceConfig {
    ApplianceConfig {
        host: "127.0.0.1".into(),
        username: "admin".into(),
        password: "pw".to_string().into(),
        // A helper name that cannot exist on the test host, so the
        // fallback path fails fast and deterministically.
        ssh_helper: "synohalt-test-no-such-helper".into(),
        timeout: Duration::from_secs(5),
        ..ApplianceConfig::default()
    }
}

fn appliance(server: &MockServer) -> Appliance {
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DsmClient::with_client(reqwest::Client::new(), base_url)
        .with_verify_delay(Duration::ZERO);
    Appliance::with_client(client, config())
}

async fn mount_login(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .and(query_param("method", "login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "sid": "flow-sid" }
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_logout(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .and(query_param("method", "logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn bundle(id: &str, name: &str, status: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "status": status })
}

// ── Shutdown sequence ───────────────────────────────────────────────

#[tokio::test]
async fn test_login_failure_short_circuits_everything() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .and(query_param("method", "login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": { "code": 400 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    // No candidate requests, and no logout without a session.
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_logout(&server, 0).await;

    let appliance = appliance(&server);
    let report = appliance
        .shutdown(ShutdownMethod::ApiOnly, &CancellationToken::new())
        .await;

    assert!(!report.success);
    assert!(report.detail.contains("authentication failed"));
}

#[tokio::test]
async fn test_logout_follows_successful_shutdown() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_logout(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.Core.System"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let appliance = appliance(&server);
    let report = appliance
        .shutdown(ShutdownMethod::ApiOnly, &CancellationToken::new())
        .await;

    assert!(report.success);
    assert_eq!(
        report.via,
        Some(ShutdownVia::Api {
            api: "SYNO.Core.System"
        })
    );
}

#[tokio::test]
async fn test_logout_follows_candidate_exhaustion() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_logout(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": { "code": 105 }
        })))
        .expect(3)
        .mount(&server)
        .await;

    let appliance = appliance(&server);
    let report = appliance
        .shutdown(ShutdownMethod::ApiOnly, &CancellationToken::new())
        .await;

    assert!(!report.success);
    assert!(report.detail.contains("exhausted"));
}

#[tokio::test]
async fn test_ssh_only_skips_primary_candidates() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_logout(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let appliance = appliance(&server);
    let report = appliance
        .shutdown(ShutdownMethod::SshOnly, &CancellationToken::new())
        .await;

    // The configured helper does not exist, so the shell path fails --
    // but the primary candidates were never touched and the session was
    // still bracketed by login/logout.
    assert!(!report.success);
    assert!(report.detail.contains("not found"), "detail: {}", report.detail);
}

#[tokio::test]
async fn test_api_then_ssh_escalates_only_after_exhaustion() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_logout(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": { "code": 119 }
        })))
        .expect(3)
        .mount(&server)
        .await;

    let appliance = appliance(&server);
    let report = appliance
        .shutdown(ShutdownMethod::ApiThenSsh, &CancellationToken::new())
        .await;

    assert!(!report.success);
    assert!(report.detail.contains("remote shutdown failed"));
}

#[tokio::test]
async fn test_api_only_never_escalates() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_logout(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": { "code": 119 }
        })))
        .expect(3)
        .mount(&server)
        .await;

    let appliance = appliance(&server);
    let report = appliance
        .shutdown(ShutdownMethod::ApiOnly, &CancellationToken::new())
        .await;

    assert!(!report.success);
    // Exhaustion is reported directly; the shell path never ran.
    assert!(!report.detail.contains("remote"));
}

#[tokio::test]
async fn test_pre_cancelled_token_aborts_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let appliance = appliance(&server);
    let report = appliance.shutdown(ShutdownMethod::ApiOnly, &cancel).await;

    assert!(!report.success);
    assert!(report.detail.contains("cancelled"));
}

// ── Bundle batch ────────────────────────────────────────────────────

#[tokio::test]
async fn test_manage_all_reports_partial_failure_per_name() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_logout(&server, 1).await;

    // All four predefined bundles exist and are stopped.
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("method", "list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "projects": [
                bundle("id-iot", "iot", "STOPPED"),
                bundle("id-jelly", "jellyfin", "STOPPED"),
                bundle("id-arr", "arr-project", "STOPPED"),
                bundle("id-watch", "watchtower", "STOPPED"),
            ]}
        })))
        .mount(&server)
        .await;

    // Three starts are accepted; jellyfin's is rejected.
    for id in ["id-iot", "id-arr", "id-watch"] {
        Mock::given(method("POST"))
            .and(path("/webapi/entry.cgi"))
            .and(body_string_contains(format!("id=%22{id}%22")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/webapi/entry.cgi"))
        .and(body_string_contains("id=%22id-jelly%22"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": { "code": 117 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let appliance = appliance(&server);
    let report = appliance.manage_all(BatchAction::Start).await.unwrap();

    assert_eq!(report.entries.len(), 4);
    assert!(!report.all_succeeded());
    let failed: Vec<&str> = report
        .entries
        .iter()
        .filter(|e| !e.success)
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(failed, vec!["jellyfin"]);
}

#[tokio::test]
async fn test_stop_all_short_circuits_already_stopped_bundles() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_logout(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("method", "list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "projects": [
                bundle("id-iot", "iot", "STOPPED"),
                bundle("id-jelly", "jellyfin", "STOPPED"),
                bundle("id-arr", "arr-project", "STOPPED"),
                bundle("id-watch", "watchtower", "STOPPED"),
            ]}
        })))
        .mount(&server)
        .await;

    // Everything is already in the target state: no mutating calls.
    Mock::given(method("POST"))
        .and(path("/webapi/entry.cgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let appliance = appliance(&server);
    let report = appliance.manage_all(BatchAction::Stop).await.unwrap();

    assert!(report.all_succeeded());
}

#[tokio::test]
async fn test_manage_all_fails_whole_batch_on_login_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .and(query_param("method", "login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": { "code": 400 }
        })))
        .mount(&server)
        .await;

    let appliance = appliance(&server);
    assert!(appliance.manage_all(BatchAction::Start).await.is_err());
}

// ── Facade bundle operations ────────────────────────────────────────

#[tokio::test]
async fn test_bundle_status_not_found_is_an_error() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;
    mount_logout(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("method", "list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "projects": [bundle("id-iot", "iot", "RUNNING")] }
        })))
        .mount(&server)
        .await;

    let appliance = appliance(&server);
    let err = appliance.bundle_status("plex").await.unwrap_err();
    assert!(err.to_string().contains("plex"));
}
