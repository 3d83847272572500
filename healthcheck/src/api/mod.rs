//! REST APIハンドラー
//!
//! ルーティング、404フォールバック、パニック捕捉、リクエストログを組み立てる。

pub mod error;
pub mod health;
pub mod logs;

use std::any::Any;

use axum::{
    response::IntoResponse,
    response::Response,
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::error::HealthError;
use crate::AppState;
use error::AppError;

/// Build the application router.
pub fn create_app(state: AppState) -> Router {
    apply_middleware(routes(state))
}

/// Routes only, without middleware.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health-check", get_only(get(health::health_check)))
        .route("/status", get_only(get(health::status)))
        .route("/services", get_only(get(health::services)))
        .route("/logs/*name", get_only(get(logs::get_service_log)))
        .fallback(not_found)
        .with_state(state)
}

/// Wrap a router with panic capture and request tracing.
pub fn apply_middleware(router: Router) -> Router {
    router.layer(CatchPanicLayer::custom(handle_panic)).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// HEAD は GET ハンドラーに流れるため明示的に 404 にする
fn get_only(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.head(not_found).fallback(not_found)
}

/// Unmatched path or method.
async fn not_found() -> AppError {
    HealthError::NotFound("Not Found".to_string()).into()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError(HealthError::Internal(format!("Internal server error: {detail}"))).into_response()
}
