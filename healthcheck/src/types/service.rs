//! サービス型定義
//!
//! 監視対象コンテナ・バックグラウンドサービスの静的メタデータと、
//! リクエスト毎に組み立てられるステータスレコード

use serde::{Deserialize, Serialize};

/// Static metadata for one background worker process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Stable key (`scheduled-messages`); also names the PID file
    #[serde(skip_serializing)]
    pub key: String,
    /// Human readable name
    pub display_name: String,
    /// What the worker does
    pub description: String,
    /// Runner script, relative to the application root
    pub script: String,
    /// Log file, relative to the application root
    pub log_file: String,
}

impl ServiceDescriptor {
    /// Creates a descriptor.
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        script: impl Into<String>,
        log_file: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            description: description.into(),
            script: script.into(),
            log_file: log_file.into(),
        }
    }
}

/// Static metadata for one front-line container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerDescriptor {
    /// Container name (`sms_backend`)
    #[serde(skip_serializing)]
    pub key: String,
    /// Human readable name
    pub name: String,
    /// Published port
    pub port: u16,
    /// HTTP health endpoint, if the container has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_endpoint: Option<String>,
    /// What the container does
    pub description: String,
}

/// Process state reported by the inspection command
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// PID file present and the process answers `kill -0`
    Running,
    /// PID file present but the process is gone
    Stopped,
    /// No PID file
    NotStarted,
    /// Inspection ran but its result is not usable
    Unknown,
    /// Inspection itself could not run
    Error,
}

impl ProcessState {
    /// Parses the `PROCESS` field value. Anything unrecognised is `Unknown`.
    pub fn from_probe_value(value: &str) -> Self {
        match value.trim() {
            "running" => Self::Running,
            "stopped" => Self::Stopped,
            "not_started" => Self::NotStarted,
            _ => Self::Unknown,
        }
    }
}

/// Derived health classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthClass {
    /// 稼働中
    Healthy,
    /// 停止
    Unhealthy,
    /// 判定不能
    Unknown,
}

impl From<ProcessState> for HealthClass {
    fn from(state: ProcessState) -> Self {
        match state {
            ProcessState::Running => Self::Healthy,
            ProcessState::Stopped => Self::Unhealthy,
            ProcessState::NotStarted | ProcessState::Unknown | ProcessState::Error => {
                Self::Unknown
            }
        }
    }
}

/// Log file information for a background service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogInfo {
    /// Whether the log file exists
    pub exists: bool,
    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Modification time as reported by `stat`, or `"unknown"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Last log lines, most recent last (at most 3)
    #[serde(default)]
    pub recent_activity: Vec<String>,
    /// One-line summary
    pub summary: String,
}

impl LogInfo {
    /// Log info used when the inspection could not run.
    pub fn unavailable() -> Self {
        Self {
            exists: false,
            size_bytes: None,
            last_modified: None,
            recent_activity: Vec::new(),
            summary: "📝 Unable to check log file".to_string(),
        }
    }
}

/// Normalized status of one background service, rebuilt on every request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ServiceStatusRecord {
    /// Static metadata
    #[serde(flatten)]
    pub descriptor: ServiceDescriptor,
    /// Process state
    pub status: ProcessState,
    /// PID (current when running, last known when stopped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    /// Log file information
    pub log_info: LogInfo,
    /// Derived health
    pub health: HealthClass,
    /// Human readable status line
    pub status_message: String,
    /// Diagnostic text when the inspection failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Short form of a background service used in `/health-check`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ServiceSummary {
    /// Service key
    pub name: String,
    /// Human readable name
    pub display_name: String,
    /// What the worker does
    pub description: String,
}

impl From<&ServiceDescriptor> for ServiceSummary {
    fn from(descriptor: &ServiceDescriptor) -> Self {
        Self {
            name: descriptor.key.clone(),
            display_name: descriptor.display_name.clone(),
            description: descriptor.description.clone(),
        }
    }
}
