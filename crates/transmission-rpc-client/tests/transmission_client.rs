//! Drives the RpcClient over real HTTP against a mock Transmission daemon.

#![allow(unused_crate_dependencies)]

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use transmission_rpc_client::{Credentials, RpcClient, RpcConfig, RpcError, TransmissionApi};
use transmission_rpc_types::TorrentIdList;

const RPC_PATH: &str = "/transmission/rpc";
// base64("seeder:p@55w0rD")
const AUTHORIZATION: &str = "Basic c2VlZGVyOnBANTV3MHJE";

fn client(server: &MockServer) -> RpcClient {
    let config = RpcConfig::new(&server.url(RPC_PATH))
        .unwrap()
        .with_credentials(Credentials::new("seeder", "p@55w0rD"))
        .with_timeout(Duration::from_secs(5));
    RpcClient::try_new(config).unwrap()
}

#[test_log::test(tokio::test)]
async fn handshake_then_session_stats() {
    let server = MockServer::start_async().await;
    let handshake = server.mock(|when, then| {
        when.method(POST)
            .path(RPC_PATH)
            .header("authorization", AUTHORIZATION)
            .header("x-transmission-session-id", "")
            .json_body(json!({"method": "session-stats"}));
        then.status(409)
            .header("X-Transmission-Session-Id", "abc123")
            .body("<h1>409: Conflict</h1>");
    });
    let stats = server.mock(|when, then| {
        when.method(POST)
            .path(RPC_PATH)
            .header("authorization", AUTHORIZATION)
            .header("x-transmission-session-id", "abc123")
            .json_body(json!({"method": "session-stats"}));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "result": "success",
                "arguments": {"torrentCount": 3, "downloadSpeed": 1024}
            }));
    });

    let client = client(&server);
    let session_id = match client.session_stats("").await {
        Err(RpcError::InvalidSession { session_id }) => session_id,
        other => panic!("Expected InvalidSession, got {other:?}"),
    };
    assert_eq!(session_id, "abc123");

    let arguments = client.session_stats(&session_id).await.unwrap();
    assert_eq!(arguments["torrentCount"], 3);

    handshake.assert_async().await;
    stats.assert_async().await;
}

#[test_log::test(tokio::test)]
async fn torrent_remove_posts_ids() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(RPC_PATH)
            .header("content-type", "application/json")
            .json_body(json!({
                "method": "torrent-remove",
                "arguments": {"ids": [42, 1337], "delete-local-data": true}
            }));
        then.status(200).json_body(json!({"result": "success", "arguments": {}}));
    });

    client(&server)
        .torrent_remove("abc123", &TorrentIdList::new([42, 1337]), true)
        .await
        .unwrap();
    mock.assert_async().await;
}

#[test_log::test(tokio::test)]
async fn remote_errors_are_reported() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(RPC_PATH);
        then.status(200)
            .json_body(json!({"result": "gotNewBlocklist: http error 404: Not Found"}));
    });

    let result = client(&server).blocklist_update("abc123").await;
    assert!(matches!(result, Err(RpcError::BlocklistNotFound { .. })));
}

#[test_log::test(tokio::test)]
async fn unauthorized_passes_through() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(RPC_PATH);
        then.status(401).body("<h1>401: Unauthorized</h1>");
    });

    let result = client(&server).session_get("abc123").await;
    match result {
        Err(RpcError::Client(err)) => assert_eq!(err.status().map(|s| s.as_u16()), Some(401)),
        other => panic!("Expected Client error, got {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn server_errors_are_request_failures() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(RPC_PATH);
        then.status(500);
    });

    let result = client(&server).session_get("abc123").await;
    assert!(matches!(result, Err(RpcError::RequestFailure(_))));
}

#[test_log::test(tokio::test)]
async fn redirects_are_not_followed() {
    let server = MockServer::start_async().await;
    let moved = server.mock(|when, then| {
        when.method(POST).path(RPC_PATH);
        then.status(301).header("location", "/elsewhere");
    });
    server.mock(|when, then| {
        when.method(GET).path("/elsewhere");
        then.status(200)
            .json_body(json!({"result": "success", "arguments": {"via": "GET"}}));
    });

    let result = client(&server).session_get("abc123").await;
    match result {
        Err(RpcError::RequestFailure(err)) => assert!(err.to_string().contains("301")),
        other => panic!("Expected RequestFailure, got {other:?}"),
    }
    moved.assert_async().await;
}

#[test_log::test(tokio::test)]
async fn unreachable_daemon_is_a_request_failure() {
    let config = RpcConfig::new("http://127.0.0.1:1/transmission/rpc").unwrap();
    let result = RpcClient::try_new(config)
        .unwrap()
        .session_get("abc123")
        .await;
    assert!(matches!(result, Err(RpcError::RequestFailure(_))));
}
