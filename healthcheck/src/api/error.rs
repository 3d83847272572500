//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング。本文は常に `{error, timestamp}` 形式のJSON。

use axum::{response::IntoResponse, Json};
use tracing::{debug, error};

use crate::error::HealthError;
use crate::types::ErrorBody;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub HealthError);

impl From<HealthError> for AppError {
    fn from(err: HealthError) -> Self {
        AppError(err)
    }
}

impl AppError {
    /// Text placed in the `error` field of the response body.
    pub fn message(&self) -> String {
        match &self.0 {
            HealthError::NotFound(message) | HealthError::Internal(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            error!(error = %self.0, status = status.as_u16(), "request failed");
        } else {
            debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }

        (status, Json(ErrorBody::new(self.message()))).into_response()
    }
}
