//! 統合テスト用の共通ヘルパー

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use healthcheck::config::HealthConfig;
use healthcheck::probe::{CommandRunner, ProbeOutcome};
use tower::ServiceExt;

/// プログラム名ごとに決められた結果を返すテスト用ランナー
#[derive(Default)]
pub struct ScriptedRunner {
    outcomes: Mutex<HashMap<String, Vec<ProbeOutcome>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// `program` の呼び出しに順番に返す結果を登録する（最後の結果は繰り返される）
    pub fn with(self, program: &str, outcomes: Vec<ProbeOutcome>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(program.to_string(), outcomes);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(String, Vec<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[String], _limit: Duration) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));

        let mut outcomes = self.outcomes.lock().unwrap();
        match outcomes.get_mut(program) {
            Some(list) if list.len() > 1 => list.remove(0),
            Some(list) if !list.is_empty() => list[0].clone(),
            _ => ProbeOutcome::launch_failed(format!("failed to run {program}: not scripted")),
        }
    }
}

pub fn ok(stdout: &str) -> ProbeOutcome {
    ProbeOutcome::exited(Some(0), stdout.to_string(), String::new())
}

pub fn failed(code: i32, stderr: &str) -> ProbeOutcome {
    ProbeOutcome::exited(Some(code), String::new(), stderr.to_string())
}

/// 一時ディレクトリに `/bin/sh` スクリプトを書き、それを使う設定を返す
pub fn script_config(dir: &Path, body: &str) -> HealthConfig {
    let script = dir.join("health-check.sh");
    std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
    let logs = dir.join("logs");
    std::fs::create_dir_all(&logs).unwrap();

    HealthConfig {
        port: 0,
        script_path: script,
        script_interpreter: "/bin/sh".to_string(),
        health_timeout: Duration::from_secs(1),
        inspect_timeout: Duration::from_secs(1),
        log_dir: logs,
        ..HealthConfig::default()
    }
}

/// ルーターに1リクエスト送り、ステータス・ヘッダー・ボディを返す
pub async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes.to_vec())
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = send(app, Method::GET, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

pub fn app(config: HealthConfig, runner: Arc<dyn CommandRunner>) -> Router {
    healthcheck::api::create_app(healthcheck::AppState::new(config, runner))
}
