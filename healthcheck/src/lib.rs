//! SMS stack health check server
//!
//! ロードバランサーとオペレーター向けに、同居するサービス群
//! （バックエンド・フロントエンド・リバースプロキシ・バックグラウンドワーカー）の
//! 健康状態をローカルHTTPで報告する。

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// エラー型
pub mod error;

/// バックグラウンドサービス調査プロトコル
pub mod inspect;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 外部コマンド実行
pub mod probe;

/// レポート組み立て
pub mod report;

/// axumサーバー起動・シャットダウン
pub mod server;

/// バックグラウンドサービスの状態集約
pub mod services;

/// 型定義
pub mod types;

use std::sync::Arc;

/// アプリケーション状態
///
/// リクエスト間で共有されるのは不変の設定とステートレスなランナーのみ。
#[derive(Clone)]
pub struct AppState {
    /// 起動時に確定した設定
    pub config: Arc<HealthConfig>,
    /// 外部コマンドランナー
    pub runner: Arc<dyn probe::CommandRunner>,
}

pub use config::HealthConfig;

impl AppState {
    /// Creates application state.
    pub fn new(config: HealthConfig, runner: Arc<dyn probe::CommandRunner>) -> Self {
        Self {
            config: Arc::new(config),
            runner,
        }
    }
}
