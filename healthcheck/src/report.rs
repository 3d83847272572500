//! レポート組み立て
//!
//! エンドポイント毎のペイロードとHTTPステータスコードを決定する。
//!
//! - `/health-check`: スクリプトの終了コードで 200 / 503、タイムアウトは 503、
//!   起動できなかった場合は 500
//! - `/status`: 外部プローブを一切行わず常に 200
//! - `/services`: サブレポートが不健康でも 200（全体の組み立て失敗のみ 500）

use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{error, info, warn};

use crate::config::HealthConfig;
use crate::error::{HealthError, HealthResult};
use crate::probe::{CommandRunner, ProbeOutcome};
use crate::services::collect_service_statuses;
use crate::types::{
    now_timestamp, HealthReport, OverallHealth, OverallStatus, ReportStatus, ServiceSummary,
    ServicesReport, StatusReport,
};

/// Name reported by `/status`
pub const SERVER_NAME: &str = "ALB Health Check Server";

/// Run the health check script once.
pub async fn run_health_script(
    runner: &dyn CommandRunner,
    config: &HealthConfig,
) -> ProbeOutcome {
    let args = vec![config.script_path.display().to_string()];
    runner
        .run(&config.script_interpreter, &args, config.health_timeout)
        .await
}

/// Build the `/health-check` report.
pub async fn build_health_report(
    runner: &dyn CommandRunner,
    config: &HealthConfig,
) -> (StatusCode, HealthReport) {
    let outcome = run_health_script(runner, config).await;
    health_report_from_outcome(config, &outcome)
}

/// Map a health script outcome to the `/health-check` report. Pure.
///
/// Exactly one of four outcomes applies: healthy (200), unhealthy (503),
/// timed out (503), or could not be run (500).
pub fn health_report_from_outcome(
    config: &HealthConfig,
    outcome: &ProbeOutcome,
) -> (StatusCode, HealthReport) {
    let timestamp = now_timestamp();

    if outcome.timed_out {
        error!("❌ Health check timed out");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            bare_report(
                timestamp,
                format!(
                    "Health check timed out after {} seconds",
                    config.health_timeout_secs()
                ),
            ),
        );
    }

    let Some(exit_code) = outcome.exit_code else {
        let reason = outcome
            .launch_error
            .clone()
            .or_else(|| outcome.stderr_trimmed().map(str::to_string))
            .unwrap_or_else(|| "health check script terminated without exit code".to_string());
        error!("❌ Health check server error: {}", reason);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            bare_report(timestamp, format!("Health check server error: {reason}")),
        );
    };

    let containers = config.containers.iter().map(|c| c.key.clone()).collect();
    let background_services = config.services.iter().map(ServiceSummary::from).collect();
    let details = outcome.stdout_trimmed().to_string();

    if exit_code == 0 {
        info!("✅ Health check passed - all services healthy");
        (
            StatusCode::OK,
            HealthReport {
                status: ReportStatus::Healthy,
                timestamp,
                containers: Some(containers),
                background_services: Some(background_services),
                error: None,
                details: Some(details),
            },
        )
    } else {
        warn!(
            exit_code,
            "⚠️ Health check failed - one or more services unhealthy"
        );
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthReport {
                status: ReportStatus::Unhealthy,
                timestamp,
                containers: Some(containers),
                background_services: Some(background_services),
                error: Some(
                    outcome
                        .stderr_trimmed()
                        .unwrap_or("Health check failed")
                        .to_string(),
                ),
                details: Some(details),
            },
        )
    }
}

/// Build the `/status` report. Never probes anything.
pub fn build_status_report(config: &HealthConfig) -> StatusReport {
    StatusReport {
        service: SERVER_NAME,
        status: "running",
        timestamp: now_timestamp(),
        port: config.port,
        script: config.script_path.display().to_string(),
    }
}

/// Map a health script outcome to the `overall_health` sub-object. Pure.
pub fn overall_health_from_outcome(
    config: &HealthConfig,
    outcome: &ProbeOutcome,
) -> OverallHealth {
    let last_check = now_timestamp();

    let failure = if outcome.timed_out {
        Some(format!(
            "Health check timed out after {} seconds",
            config.health_timeout_secs()
        ))
    } else if outcome.exit_code.is_none() {
        Some(
            outcome
                .launch_error
                .clone()
                .unwrap_or_else(|| "health check script terminated without exit code".to_string()),
        )
    } else {
        None
    };

    match failure {
        Some(reason) => OverallHealth {
            status: OverallStatus::Unknown,
            last_check,
            details: None,
            errors: None,
            error: Some(format!("Failed to get overall health: {reason}")),
        },
        None => OverallHealth {
            status: if outcome.succeeded {
                OverallStatus::Healthy
            } else {
                OverallStatus::Unhealthy
            },
            last_check,
            details: Some(outcome.stdout_trimmed().to_string()),
            errors: Some(outcome.stderr_trimmed().map(str::to_string)),
            error: None,
        },
    }
}

/// Build the `/services` report.
///
/// Background services are inspected first, then the health script is run
/// once for `overall_health`.
pub async fn build_services_report(
    runner: Arc<dyn CommandRunner>,
    config: Arc<HealthConfig>,
) -> ServicesReport {
    let background_services =
        collect_service_statuses(Arc::clone(&runner), Arc::clone(&config)).await;
    let outcome = run_health_script(runner.as_ref(), &config).await;

    ServicesReport {
        timestamp: now_timestamp(),
        containers: config.containers.clone(),
        background_services,
        overall_health: overall_health_from_outcome(&config, &outcome),
    }
}

/// Serialize the `/services` report. A failure here becomes the 500 body.
pub fn render_services_report(report: &ServicesReport) -> HealthResult<Vec<u8>> {
    serde_json::to_vec(report)
        .map_err(|e| HealthError::Internal(format!("Failed to get services detail: {e}")))
}

fn bare_report(timestamp: String, error: String) -> HealthReport {
    HealthReport {
        status: ReportStatus::Unhealthy,
        timestamp,
        containers: None,
        background_services: None,
        error: Some(error),
        details: None,
    }
}
