//! End-to-end HTTP checks against a live listener.

use std::net::SocketAddr;
use std::time::Duration;

use pretty_assertions::assert_eq;
use probe_service::api::{create_router, AppState};
use probe_service::server::Server;
use probe_service::utils::ShutdownToken;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

/// Start the full router on port 0 and return its address.
async fn start() -> (SocketAddr, ShutdownToken, JoinHandle<probe_service::Result<()>>) {
    let server = Server::bind(
        ([127, 0, 0, 1], 0).into(),
        create_router(AppState::new()),
        Duration::from_secs(5),
    )
    .await
    .unwrap();
    let addr = server.local_addr().unwrap();
    let token = ShutdownToken::new();
    let handle = tokio::spawn(server.run(token.clone()));
    (addr, token, handle)
}

#[tokio::test]
async fn get_endpoints_return_fixed_payloads() {
    let (addr, token, handle) = start().await;
    let client = reqwest::Client::new();

    for (path, expected) in [
        ("health", json!({"health": "foo"})),
        ("ready", json!({"ready": "bar"})),
    ] {
        let response = client
            .get(format!("http://{addr}/api/v1/{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.json::<Value>().await.unwrap(), expected);
    }

    token.cancel();
    assert!(handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn post_endpoints_accept_and_reject() {
    let (addr, token, handle) = start().await;
    let client = reqwest::Client::new();

    let ok = client
        .post(format!("http://{addr}/api/v1/health"))
        .json(&json!({"health": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(ok.json::<Value>().await.unwrap(), json!({"status": "ok"}));

    let missing = client
        .post(format!("http://{addr}/api/v1/health"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        missing.json::<Value>().await.unwrap(),
        json!({"error": "missing required field `health`"})
    );

    let garbage = client
        .post(format!("http://{addr}/api/v1/ready"))
        .body("<ready/>")
        .send()
        .await
        .unwrap();
    assert_eq!(garbage.status(), StatusCode::BAD_REQUEST);

    token.cancel();
    assert!(handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn swagger_ui_is_served() {
    let (addr, token, handle) = start().await;

    let response = reqwest::get(format!("http://{addr}/swagger/index.html"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("<html"), "not html: {body}");

    token.cancel();
    assert!(handle.await.unwrap().is_ok());
}
