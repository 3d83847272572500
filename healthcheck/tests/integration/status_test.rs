//! GET /status

use std::sync::Arc;

use axum::http::StatusCode;

use crate::support::{app, get_json, script_config, ScriptedRunner};

#[tokio::test]
async fn status_never_probes() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = script_config(dir.path(), "exit 1");
    config.port = 8888;
    let script = config.script_path.display().to_string();
    let runner = Arc::new(ScriptedRunner::new());

    for _ in 0..3 {
        let (status, body) = get_json(app(config.clone(), runner.clone()), "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "ALB Health Check Server");
        assert_eq!(body["status"], "running");
        assert_eq!(body["port"], 8888);
        assert_eq!(body["script"], script.as_str());
    }

    assert_eq!(runner.calls(), 0);
}
