//! Unknown paths and methods

use std::sync::Arc;

use axum::http::{Method, StatusCode};

use crate::support::{app, script_config, send, ScriptedRunner};

#[tokio::test]
async fn unknown_path_is_404_for_every_method() {
    let dir = tempfile::tempdir().unwrap();
    let config = script_config(dir.path(), "exit 0");
    let runner = Arc::new(ScriptedRunner::new());

    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
        let router = app(config.clone(), runner.clone());
        let (status, _, body) = send(router, method.clone(), "/bogus").await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");

        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Not Found");
        assert!(body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn non_get_on_known_path_is_404_without_probing() {
    let dir = tempfile::tempdir().unwrap();
    let config = script_config(dir.path(), "exit 0");
    let runner = Arc::new(ScriptedRunner::new());

    for method in [Method::POST, Method::HEAD, Method::PUT, Method::DELETE] {
        for uri in ["/health-check", "/services", "/status", "/logs/app"] {
            let router = app(config.clone(), runner.clone());
            let (status, _, _) = send(router, method.clone(), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        }
    }
    assert_eq!(runner.calls(), 0);
}
