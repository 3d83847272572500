//! レスポンスペイロード型定義
//!
//! 各エンドポイントが返すJSONの形

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::service::{ContainerDescriptor, ServiceStatusRecord, ServiceSummary};

/// Aggregate status reported by `/health-check`
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Health script exited 0
    Healthy,
    /// Anything else
    Unhealthy,
}

/// `/health-check` payload
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthReport {
    /// Aggregate status
    pub status: ReportStatus,
    /// Report time
    pub timestamp: String,
    /// Front-line container names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<String>>,
    /// Background service summaries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_services: Option<Vec<ServiceSummary>>,
    /// Failure description; absent when healthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Health script stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Status of the `overall_health` sub-object of `/services`
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    /// Health script exited 0
    Healthy,
    /// Health script exited non-zero
    Unhealthy,
    /// Health script could not be evaluated
    Unknown,
}

/// `overall_health` sub-object of `/services`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OverallHealth {
    /// Status
    pub status: OverallStatus,
    /// Time the script was run
    pub last_check: String,
    /// Health script stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Health script stderr; serialized as `null` when empty
    #[serde(skip_serializing_if = "is_unknown_errors")]
    pub errors: Option<Option<String>>,
    /// Why the script could not be evaluated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn is_unknown_errors(errors: &Option<Option<String>>) -> bool {
    errors.is_none()
}

/// `/status` payload
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusReport {
    /// Name of this server
    pub service: &'static str,
    /// Always `"running"`
    pub status: &'static str,
    /// Report time
    pub timestamp: String,
    /// Configured port
    pub port: u16,
    /// Configured health script
    pub script: String,
}

/// `/services` payload
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ServicesReport {
    /// Report time
    pub timestamp: String,
    /// Front-line containers keyed by name, in configured order
    #[serde(serialize_with = "serialize_keyed")]
    pub containers: Vec<ContainerDescriptor>,
    /// Background services keyed by service key, in configured order
    #[serde(serialize_with = "serialize_keyed")]
    pub background_services: Vec<ServiceStatusRecord>,
    /// Health script result
    pub overall_health: OverallHealth,
}

/// JSON error body `{error, timestamp}`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Error text
    pub error: String,
    /// Error time
    pub timestamp: String,
}

impl ErrorBody {
    /// Creates an error body stamped with the current time.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            timestamp: super::now_timestamp(),
        }
    }
}

/// Items serialized as a JSON object keyed by [`Keyed::key`].
pub trait Keyed {
    /// Map key
    fn key(&self) -> &str;
}

impl Keyed for ContainerDescriptor {
    fn key(&self) -> &str {
        &self.key
    }
}

impl Keyed for ServiceStatusRecord {
    fn key(&self) -> &str {
        &self.descriptor.key
    }
}

fn serialize_keyed<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Keyed + Serialize,
{
    let mut map = serializer.serialize_map(Some(items.len()))?;
    for item in items {
        map.serialize_entry(item.key(), item)?;
    }
    map.end()
}
