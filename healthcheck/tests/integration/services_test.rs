//! GET /services

use std::sync::Arc;

use axum::http::{header::CONTENT_TYPE, Method, StatusCode};
use healthcheck::probe::ProbeOutcome;

use crate::support::{app, failed, get_json, ok, script_config, send, ScriptedRunner};

const RUNNING: &str = "PROCESS:running|PID:4242|LOG_EXISTS:true|LOG_SIZE:2048|LOG_MODIFIED:2025-01-01 10:00:00|RECENT:one|two|three|four";

#[tokio::test]
async fn partial_failure_still_returns_200() {
    let dir = tempfile::tempdir().unwrap();
    let config = script_config(dir.path(), "exit 0");
    let runner = Arc::new(
        ScriptedRunner::new()
            .with(
                "docker",
                vec![ok(RUNNING), failed(1, "Error: No such container: sms_backend")],
            )
            .with("/bin/sh", vec![failed(1, "frontend down")]),
    );

    let (status, body) = get_json(app(config, runner.clone()), "/services").await;
    assert_eq!(status, StatusCode::OK);

    let scheduler = &body["background_services"]["scheduled-messages"];
    assert_eq!(scheduler["status"], "running");
    assert_eq!(scheduler["health"], "healthy");
    assert_eq!(scheduler["pid"], "4242");
    assert_eq!(scheduler["status_message"], "✅ Running (PID: 4242)");
    assert_eq!(
        scheduler["log_info"]["recent_activity"],
        serde_json::json!(["two", "three", "four"])
    );
    assert_eq!(scheduler["display_name"], "📨 Scheduled Messages Service");

    let ai = &body["background_services"]["ai-processor"];
    assert_eq!(ai["status"], "unknown");
    assert_eq!(ai["health"], "unknown");
    assert_eq!(ai["error"], "Error: No such container: sms_backend");
    assert_eq!(ai["log_info"]["summary"], "📝 Unable to check log file");

    assert_eq!(body["containers"]["sms_backend"]["port"], 8900);
    assert_eq!(body["containers"]["sms_backend"]["health_endpoint"], "/health");
    assert_eq!(body["containers"]["nginx_proxy"]["port"], 80);

    assert_eq!(body["overall_health"]["status"], "unhealthy");
    assert_eq!(body["overall_health"]["errors"], "frontend down");

    // 2サービスの調査 + スクリプト1回
    assert_eq!(runner.calls(), 3);
    let seen = runner.seen();
    assert_eq!(seen[0].0, "docker");
    assert_eq!(seen[0].1[..2], ["exec".to_string(), "sms_backend".to_string()]);
    assert!(seen[0].1[4].contains("scheduled-messages.pid"));
    assert!(seen[1].1[4].contains("ai-processor.pid"));
    assert_eq!(seen[2].0, "/bin/sh");
}

#[tokio::test]
async fn everything_failing_degrades_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let config = script_config(dir.path(), "exit 0");
    let runner = Arc::new(
        ScriptedRunner::new()
            .with("docker", vec![ProbeOutcome::timeout()])
            .with("/bin/sh", vec![ProbeOutcome::timeout()]),
    );

    let (status, body) = get_json(app(config, runner), "/services").await;
    assert_eq!(status, StatusCode::OK);

    for key in ["scheduled-messages", "ai-processor"] {
        let record = &body["background_services"][key];
        assert_eq!(record["status"], "error");
        assert_eq!(record["health"], "unknown");
        assert_eq!(record["error"], "Status check timed out after 1 seconds");
    }
    assert_eq!(body["overall_health"]["status"], "unknown");
    assert!(body["overall_health"]["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to get overall health:"));
}

#[tokio::test]
async fn services_keep_configured_order_on_the_wire() {
    let dir = tempfile::tempdir().unwrap();
    let config = script_config(dir.path(), "exit 0");
    let runner = Arc::new(
        ScriptedRunner::new()
            .with("docker", vec![ok(RUNNING)])
            .with("/bin/sh", vec![ok("fine")]),
    );

    let (status, headers, body) = send(app(config, runner), Method::GET, "/services").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[CONTENT_TYPE], "application/json");

    let text = String::from_utf8(body).unwrap();
    assert!(text.find("scheduled-messages").unwrap() < text.find("ai-processor").unwrap());
}
