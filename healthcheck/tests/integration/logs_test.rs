//! GET /logs/{name}

use std::sync::Arc;

use axum::http::{header::CONTENT_TYPE, Method, StatusCode};

use crate::support::{app, get_json, script_config, send, ScriptedRunner};

#[tokio::test]
async fn returns_exact_log_bytes_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let config = script_config(dir.path(), "exit 0");
    let content = "line one\nline two | with pipe\n\u{1F4E8} sent\n";
    std::fs::write(config.log_dir.join("scheduled_messages.log"), content).unwrap();

    let (status, headers, body) = send(
        app(config, Arc::new(ScriptedRunner::new())),
        Method::GET,
        "/logs/scheduled_messages",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[CONTENT_TYPE], "text/plain");
    assert_eq!(body, content.as_bytes());
}

#[tokio::test]
async fn missing_log_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let config = script_config(dir.path(), "exit 0");

    let router = app(config, Arc::new(ScriptedRunner::new()));
    let (status, body) = get_json(router, "/logs/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Log file not found");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn traversal_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let config = script_config(dir.path(), "exit 0");
    std::fs::write(dir.path().join("secret.log"), "top secret").unwrap();

    let (status, body) = get_json(
        app(config, Arc::new(ScriptedRunner::new())),
        "/logs/..%2Fsecret",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Log file not found");
}

#[tokio::test]
async fn unreadable_log_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let config = script_config(dir.path(), "exit 0");
    std::fs::create_dir(config.log_dir.join("weird.log")).unwrap();

    let router = app(config, Arc::new(ScriptedRunner::new()));
    let (status, body) = get_json(router, "/logs/weird").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to get log:"));
}
