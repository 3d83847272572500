//! Background service status aggregation.
//!
//! Each configured [`ServiceDescriptor`] is inspected once per request, in
//! configured order, and the probe outcome is turned into a
//! [`ServiceStatusRecord`]. Nothing is cached or retried.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::HealthConfig;
use crate::inspect::{inspection_args, parse_inspection, InspectionReport};
use crate::probe::{CommandRunner, ProbeOutcome};
use crate::types::{HealthClass, LogInfo, ProcessState, ServiceDescriptor, ServiceStatusRecord};

/// Inspect one background service and build its status record.
pub async fn build_service_status(
    runner: &dyn CommandRunner,
    config: &HealthConfig,
    descriptor: &ServiceDescriptor,
) -> ServiceStatusRecord {
    let args = inspection_args(config, descriptor);
    let outcome = runner
        .run(&config.exec_program, &args, config.inspect_timeout)
        .await;

    debug!(
        service = %descriptor.key,
        exit_code = ?outcome.exit_code,
        timed_out = outcome.timed_out,
        "background service inspected"
    );

    record_from_outcome(descriptor, &outcome, config.inspect_timeout.as_secs().max(1))
}

/// Map an inspection outcome to a status record. Pure.
pub fn record_from_outcome(
    descriptor: &ServiceDescriptor,
    outcome: &ProbeOutcome,
    timeout_secs: u64,
) -> ServiceStatusRecord {
    if outcome.timed_out {
        let message = format!("Status check timed out after {timeout_secs} seconds");
        return error_record(descriptor, message);
    }
    if let Some(message) = &outcome.launch_error {
        return error_record(descriptor, message.clone());
    }
    if !outcome.succeeded {
        let error = outcome
            .stderr_trimmed()
            .unwrap_or("Failed to check service status")
            .to_string();
        return ServiceStatusRecord {
            descriptor: descriptor.clone(),
            status: ProcessState::Unknown,
            pid: None,
            log_info: LogInfo::unavailable(),
            health: HealthClass::Unknown,
            status_message: "❓ Status check failed".to_string(),
            error: Some(error),
        };
    }

    record_from_report(descriptor, parse_inspection(&outcome.stdout))
}

/// Build a record from a parsed inspection line.
pub fn record_from_report(
    descriptor: &ServiceDescriptor,
    report: InspectionReport,
) -> ServiceStatusRecord {
    let pid_text = report.pid.clone().unwrap_or_default();
    let status_message = match report.process {
        ProcessState::Running => format!("✅ Running (PID: {pid_text})"),
        ProcessState::Stopped => format!("❌ Stopped (last PID: {pid_text})"),
        _ => "⚠️ Not Started".to_string(),
    };

    let summary = if !report.log_exists {
        "📝 No log file found".to_string()
    } else if report.log_size > 0 {
        format!(
            "📝 {} bytes, modified: {}",
            report.log_size, report.log_modified
        )
    } else {
        "📝 Empty log file".to_string()
    };

    ServiceStatusRecord {
        descriptor: descriptor.clone(),
        status: report.process,
        pid: report.pid,
        log_info: LogInfo {
            exists: report.log_exists,
            size_bytes: Some(report.log_size),
            last_modified: Some(report.log_modified),
            recent_activity: report.recent,
            summary,
        },
        health: HealthClass::from(report.process),
        status_message,
        error: None,
    }
}

/// Static record used when live status could not be collected at all.
pub fn fallback_record(descriptor: &ServiceDescriptor) -> ServiceStatusRecord {
    ServiceStatusRecord {
        descriptor: descriptor.clone(),
        status: ProcessState::Unknown,
        pid: None,
        log_info: LogInfo::unavailable(),
        health: HealthClass::Unknown,
        status_message: "❓ Status unavailable".to_string(),
        error: Some("Failed to get live status".to_string()),
    }
}

/// Inspect every configured service sequentially.
///
/// The inspection loop runs in its own task; if that task fails, every
/// service gets its [`fallback_record`].
pub async fn collect_service_statuses(
    runner: Arc<dyn CommandRunner>,
    config: Arc<HealthConfig>,
) -> Vec<ServiceStatusRecord> {
    let task_config = Arc::clone(&config);
    let task = tokio::spawn(async move {
        let mut records = Vec::with_capacity(task_config.services.len());
        for descriptor in &task_config.services {
            records.push(build_service_status(runner.as_ref(), &task_config, descriptor).await);
        }
        records
    });

    match task.await {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "Failed to get live background services status");
            config.services.iter().map(fallback_record).collect()
        }
    }
}

fn error_record(descriptor: &ServiceDescriptor, message: String) -> ServiceStatusRecord {
    ServiceStatusRecord {
        descriptor: descriptor.clone(),
        status: ProcessState::Error,
        pid: None,
        log_info: LogInfo::unavailable(),
        health: HealthClass::Unknown,
        status_message: format!("❌ Error: {message}"),
        error: Some(message),
    }
}
