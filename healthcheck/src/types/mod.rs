//! 型定義

pub mod report;
pub mod service;

pub use report::{
    ErrorBody, HealthReport, OverallHealth, OverallStatus, ReportStatus, ServicesReport,
    StatusReport,
};
pub use service::{
    ContainerDescriptor, HealthClass, LogInfo, ProcessState, ServiceDescriptor,
    ServiceStatusRecord, ServiceSummary,
};

/// Current UTC time as RFC 3339 with a trailing `Z`.
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.6fZ")
        .to_string()
}
