//! 実ソケットでのサーバー起動・停止

use std::sync::Arc;
use std::time::Duration;

use healthcheck::probe::ProcessRunner;
use healthcheck::AppState;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::support::script_config;

#[tokio::test]
async fn serves_over_tcp_and_shuts_down_on_cancel() {
    let dir = tempfile::tempdir().unwrap();
    let config = script_config(dir.path(), "echo ok");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(healthcheck::server::serve(
        listener,
        AppState::new(config, Arc::new(ProcessRunner)),
        shutdown.clone(),
    ));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let response = client
        .get(format!("http://{addr}/health-check"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let response = client
        .get(format!("http://{addr}/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    drop(client);
    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not shut down")
        .expect("server task panicked")
        .expect("server returned an error");
}
