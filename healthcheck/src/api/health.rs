//! ヘルスチェックAPI
//!
//! `/health-check`, `/status`, `/services` エンドポイントを提供する。

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    Json,
};

use super::error::AppError;
use crate::{report, AppState};

/// GET /health-check
///
/// ロードバランサー向け。スクリプトの結果により 200 / 503 / 500 を返す。
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, body) = report::build_health_report(state.runner.as_ref(), &state.config).await;
    (status, Json(body))
}

/// GET /status
///
/// サーバー自身の状態。外部プローブは行わない。
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(report::build_status_report(&state.config)))
}

/// GET /services
///
/// コンテナ・バックグラウンドサービスの詳細。劣化していても 200 を返す。
pub async fn services(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let detail =
        report::build_services_report(Arc::clone(&state.runner), Arc::clone(&state.config)).await;
    let body = report::render_services_report(&detail)?;
    Ok(([(CONTENT_TYPE, "application/json")], body))
}
