//! HTTP integration tests for the Netdash server.
//!
//! Each test spins up the REAL axum server on a random port and points the
//! configured `snmpwalk`/`snmpbulkwalk` at small shell scripts that print
//! canned walk output for the OID they are asked for.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::{Duration, Instant};

use netdash_server::{api, config};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Bridge-MIB switch: two learned MACs, one with an ARP entry.
const SWITCH_TOOL: &str = r#"
for oid; do :; done
case "$oid" in
1.3.6.1.2.1.17.4.3.1.2)
  echo '.1.3.6.1.2.1.17.4.3.1.2.170.187.204.221.238.2 = INTEGER: 2'
  echo '.1.3.6.1.2.1.17.4.3.1.2.170.187.204.221.238.1 = INTEGER: 1'
  ;;
1.3.6.1.2.1.17.1.4.1.2)
  echo '.1.3.6.1.2.1.17.1.4.1.2.1 = INTEGER: 1'
  echo '.1.3.6.1.2.1.17.1.4.1.2.2 = INTEGER: 2'
  ;;
1.3.6.1.2.1.31.1.1.1.1)
  echo '.1.3.6.1.2.1.31.1.1.1.1.1 = STRING: "Port 1"'
  echo '.1.3.6.1.2.1.31.1.1.1.1.2 = STRING: "Port 2"'
  ;;
1.3.6.1.2.1.4.22.1.2)
  echo '.1.3.6.1.2.1.4.22.1.2.1.192.168.1.10 = Hex-STRING: AA BB CC DD EE 02 '
  ;;
1.3.6.1.2.1.1.1)
  echo '.1.3.6.1.2.1.1.1.0 = STRING: "Device XYZ"'
  ;;
*)
  echo 'No Such Object available on this agent at this OID'
  ;;
esac
"#;

/// LANCOM access point: no bridge tables, one WLAN station.
const ACCESS_POINT_TOOL: &str = r#"
for oid; do :; done
case "$oid" in
1.3.6.1.4.1.2356.11.1.3.32.1)
  echo '.1.3.6.1.4.1.2356.11.1.3.32.1.2.170.187.204.221.238.5 = INTEGER: 36'
  echo '.1.3.6.1.4.1.2356.11.1.3.32.1.3.170.187.204.221.238.5 = INTEGER: 2'
  ;;
1.3.6.1.4.1.2356.11.1.3.32.1.10)
  echo '.1.3.6.1.4.1.2356.11.1.3.32.1.10.170.187.204.221.238.5 = STRING: "Guest"'
  ;;
1.3.6.1.2.1.4.22.1.2)
  echo '.1.3.6.1.2.1.4.22.1.2.3.10.0.0.5 = Hex-STRING: AA BB CC DD EE 05'
  ;;
esac
"#;

const UNREACHABLE_TOOL: &str = "echo 'Timeout: No Response from host' >&2\nexit 1";

const HANGING_TOOL: &str = "exec sleep 60";

/// Write an executable shell script into `dir` and return its path.
fn write_tool(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("failed to write fake tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("failed to chmod fake tool");
    path.to_string_lossy().into_owned()
}

/// Spawn a real axum server on a random port using the given walk tools.
///
/// The temp dir holding the scripts is returned so it outlives the test.
async fn spawn_test_server(
    walk_body: &str,
    bulkwalk_body: &str,
    hard_timeout_secs: u64,
) -> (String, tempfile::TempDir) {
    let tools = tempfile::tempdir().expect("failed to create temp dir");
    let mut config = config::AppConfig::default();
    config.snmp.walk_command = write_tool(tools.path(), "snmpwalk", walk_body);
    config.snmp.bulkwalk_command = write_tool(tools.path(), "snmpbulkwalk", bulkwalk_body);
    config.snmp.hard_timeout_secs = hard_timeout_secs;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let addr = listener.local_addr().expect("failed to get local address");

    let app = api::router(api::AppState::new(config));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });

    (format!("http://{addr}"), tools)
}

async fn post_snmp(base_url: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base_url}/api/v1/snmp"))
        .json(&body)
        .send()
        .await
        .expect("snmp request failed")
}

// ── Health ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let (base_url, _tools) = spawn_test_server("exit 0", "exit 0", 12).await;
    let resp = reqwest::get(format!("{base_url}/api/v1/health"))
        .await
        .expect("health request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

// ── MAC table ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_mac_table_from_bridge_mib() {
    let (base_url, _tools) = spawn_test_server("exit 1", SWITCH_TOOL, 12).await;

    let resp = post_snmp(
        &base_url,
        json!({"host": "192.168.1.2", "community": "public", "version": "2c", "type": "mac-table"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("failed to parse JSON");
    assert_eq!(body["source"], "bridge");
    assert_eq!(body["count"], 2);
    assert_eq!(body["countWithIp"], 1);
    assert_eq!(body["hasMacTable"], true);
    assert_eq!(
        body["entries"],
        json!([
            {"mac": "aa:bb:cc:dd:ee:01", "bridgePort": 1, "portName": "Port 1", "ip": null},
            {"mac": "aa:bb:cc:dd:ee:02", "bridgePort": 2, "portName": "Port 2", "ip": "192.168.1.10"}
        ])
    );
}

#[tokio::test]
async fn test_mac_table_wlan_fallback_with_v1_tool() {
    // v1 must use the single walk tool; the bulk tool would find nothing.
    let (base_url, _tools) = spawn_test_server(ACCESS_POINT_TOOL, "exit 1", 12).await;

    let resp = post_snmp(
        &base_url,
        json!({"host": "ap-1", "community": "public", "version": "1"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("failed to parse JSON");
    assert_eq!(body["source"], "wlan-clients");
    assert_eq!(body["count"], 1);
    assert_eq!(
        body["entries"][0],
        json!({"mac": "aa:bb:cc:dd:ee:05", "bridgePort": 0, "portName": "WLAN: Guest (5G) CH36", "ip": "10.0.0.5"})
    );
}

#[tokio::test]
async fn test_mac_table_unreachable_device_is_empty_not_error() {
    let (base_url, _tools) = spawn_test_server(UNREACHABLE_TOOL, UNREACHABLE_TOOL, 12).await;

    let resp = post_snmp(&base_url, json!({"host": "10.9.9.9", "community": "public"})).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("failed to parse JSON");
    assert_eq!(body["entries"], json!([]));
    assert_eq!(body["count"], 0);
    assert_eq!(body["hasMacTable"], false);
    assert_eq!(body["source"], "wlan-clients");
}

#[tokio::test]
async fn test_mac_table_hanging_tool_is_bounded_by_hard_timeout() {
    let (base_url, _tools) = spawn_test_server(HANGING_TOOL, HANGING_TOOL, 1).await;

    let started = Instant::now();
    let resp = post_snmp(&base_url, json!({"host": "10.9.9.9", "community": "public"})).await;
    let elapsed = started.elapsed();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("failed to parse JSON");
    assert_eq!(body["count"], 0);

    // Two batches of parallel walks, each capped at the 1s budget. The eight
    // walks run one after another would take about 8s.
    assert!(
        elapsed < Duration::from_secs(4),
        "each walk batch should run in parallel, took {elapsed:?}"
    );
}

// ── Connectivity test ───────────────────────────────────────────────

#[tokio::test]
async fn test_connectivity_ok() {
    let (base_url, _tools) = spawn_test_server("exit 1", SWITCH_TOOL, 12).await;

    let resp = post_snmp(
        &base_url,
        json!({"host": "192.168.1.2", "community": "public", "type": "test"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("failed to parse JSON");
    assert_eq!(body, json!({"ok": true, "sysDescr": "Device XYZ"}));
}

#[tokio::test]
async fn test_connectivity_no_response() {
    let (base_url, _tools) = spawn_test_server(UNREACHABLE_TOOL, UNREACHABLE_TOOL, 12).await;

    let resp = post_snmp(
        &base_url,
        json!({"host": "192.168.1.2", "community": "public", "type": "test"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("failed to parse JSON");
    assert_eq!(body, json!({"ok": false, "sysDescr": "no response"}));
}

// ── Validation ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_rejects_malformed_host_and_community() {
    let (base_url, _tools) = spawn_test_server(SWITCH_TOOL, SWITCH_TOOL, 12).await;

    for body in [
        json!({"host": "10.0.0.1;reboot", "community": "public"}),
        json!({"host": "-v3", "community": "public"}),
        json!({"host": "10.0.0.1", "community": "pub lic"}),
        json!({"host": "10.0.0.1", "community": ""}),
    ] {
        let resp = post_snmp(&base_url, body.clone()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body}");
        let json: Value = resp.json().await.expect("failed to parse JSON");
        assert_eq!(json["code"], "validation_error");
    }
}

#[tokio::test]
async fn test_rejects_unsupported_version() {
    let (base_url, _tools) = spawn_test_server(SWITCH_TOOL, SWITCH_TOOL, 12).await;

    let resp = post_snmp(
        &base_url,
        json!({"host": "10.0.0.1", "community": "public", "version": "3"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = resp.json().await.expect("failed to parse JSON");
    assert_eq!(json["code"], "validation_error");
}

#[tokio::test]
async fn test_unknown_api_route_is_not_found() {
    let (base_url, _tools) = spawn_test_server("exit 0", "exit 0", 12).await;

    let resp = reqwest::get(format!("{base_url}/api/v1/services"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json: Value = resp.json().await.expect("failed to parse JSON");
    assert_eq!(json["code"], "not_found");
}
