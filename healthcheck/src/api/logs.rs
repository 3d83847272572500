//! ログ閲覧API
//!
//! `/logs/{name}` エンドポイントを提供する。`{log_dir}/{name}.log` の内容を
//! そのまま `text/plain` で返し、失敗時のみJSONを返す。

use std::path::{Path as FsPath, PathBuf};

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use tracing::debug;

use super::error::AppError;
use crate::error::HealthError;
use crate::AppState;

/// GET /logs/{name}
pub async fn get_service_log(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let path = log_file_path(&state.config.log_dir, &name)
        .ok_or_else(|| HealthError::NotFound("Log file not found".to_string()))?;

    let content = tokio::fs::read(&path).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            HealthError::NotFound("Log file not found".to_string())
        } else {
            HealthError::Internal(format!("Failed to get log: {err}"))
        }
    })?;

    debug!(path = %path.display(), bytes = content.len(), "serving log file");
    Ok(([(header::CONTENT_TYPE, "text/plain")], content))
}

/// Resolve `{log_dir}/{name}.log`; `None` unless `name` is a single plain path component.
pub fn log_file_path(log_dir: &FsPath, name: &str) -> Option<PathBuf> {
    let valid = !name.is_empty()
        && !name.contains(['/', '\\', '\0'])
        && !name.contains("..")
        && !name.starts_with('.');
    valid.then(|| log_dir.join(format!("{name}.log")))
}
