//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! プローブ由来の失敗（タイムアウト・実行失敗・パース失敗）は通常は
//! [`crate::probe::ProbeOutcome`] に閉じ込められ、レポートの劣化として表現される。
//! ここで定義する型はレポートに畳み込めなかった失敗をHTTPレスポンスへ変換するために使う。

use axum::http::StatusCode;
use thiserror::Error;

/// Health check server error type
#[derive(Debug, Error)]
pub enum HealthError {
    /// External command exceeded its time bound
    #[error("Probe timed out after {0} seconds")]
    ProbeTimeout(u64),

    /// External command could not be executed or exited abnormally
    #[error("Probe execution failed: {0}")]
    ProbeExecution(String),

    /// Malformed probe output
    #[error("Parse error: {0}")]
    Parse(String),

    /// Resource not found (log file, route)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HealthError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ProbeTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ProbeExecution(_)
            | Self::Parse(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result alias for this crate
pub type HealthResult<T> = Result<T, HealthError>;
