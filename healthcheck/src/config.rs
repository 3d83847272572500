//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to legacy variable names, and the [`HealthConfig`] struct that is passed
//! explicitly into the router at construction time.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{HealthError, HealthResult};
use crate::types::{ContainerDescriptor, ServiceDescriptor};

/// Default listen port
pub const DEFAULT_PORT: u16 = 8888;
/// Default health check script
pub const DEFAULT_SCRIPT_PATH: &str = "/app/sms-seller-connect/health-check.sh";
/// Default health script timeout (seconds)
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 15;
/// Default per-service inspection timeout (seconds)
pub const DEFAULT_INSPECT_TIMEOUT_SECS: u64 = 10;

/// Get an environment variable with fallback to a legacy name
///
/// If the new variable name is set, returns its value.
/// If only the legacy variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use healthcheck::config::get_env_with_fallback;
///
/// let script = get_env_with_fallback("HEALTHCHECK_SCRIPT", "HEALTH_CHECK_SCRIPT");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Runtime configuration of the health check server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthConfig {
    /// Bind address (loopback)
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Health check script
    pub script_path: PathBuf,
    /// Interpreter used to run the script
    pub script_interpreter: String,
    /// Bound on the health script run
    pub health_timeout: Duration,
    /// Bound on each background service inspection
    pub inspect_timeout: Duration,
    /// Program providing `exec` into the target (`docker`)
    pub exec_program: String,
    /// Container the inspection runs in
    pub exec_target: String,
    /// Application root inside the target; service log files are relative to it
    pub app_root: String,
    /// Directory holding `{service}.pid` inside the target and `{name}.log` for `/logs`
    pub log_dir: PathBuf,
    /// Front-line containers
    pub containers: Vec<ContainerDescriptor>,
    /// Background services, in report order
    pub services: Vec<ServiceDescriptor>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            script_path: PathBuf::from(DEFAULT_SCRIPT_PATH),
            script_interpreter: "/bin/bash".to_string(),
            health_timeout: Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
            inspect_timeout: Duration::from_secs(DEFAULT_INSPECT_TIMEOUT_SECS),
            exec_program: "docker".to_string(),
            exec_target: "sms_backend".to_string(),
            app_root: "/app".to_string(),
            log_dir: PathBuf::from("/app/logs"),
            containers: default_containers(),
            services: default_services(),
        }
    }
}

impl HealthConfig {
    /// Load configuration from environment variables.
    ///
    /// `HEALTHCHECK_SERVICES_FILE` may point to a JSON array of service
    /// descriptors replacing the default background services.
    pub fn from_env() -> HealthResult<Self> {
        let defaults = Self::default();

        let services = match get_env_with_fallback(
            "HEALTHCHECK_SERVICES_FILE",
            "HEALTH_CHECK_SERVICES_FILE",
        ) {
            Some(path) => load_services_file(&PathBuf::from(path))?,
            None => defaults.services,
        };

        let config = Self {
            host: get_env_with_fallback_or(
                "HEALTHCHECK_HOST",
                "HEALTH_CHECK_HOST",
                &defaults.host,
            ),
            port: get_env_with_fallback_parse(
                "HEALTHCHECK_PORT",
                "HEALTH_CHECK_PORT",
                defaults.port,
            ),
            script_path: get_env_with_fallback("HEALTHCHECK_SCRIPT", "HEALTH_CHECK_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(defaults.script_path),
            script_interpreter: get_env_with_fallback_or(
                "HEALTHCHECK_SCRIPT_INTERPRETER",
                "HEALTH_CHECK_SCRIPT_INTERPRETER",
                &defaults.script_interpreter,
            ),
            health_timeout: Duration::from_secs(get_env_with_fallback_parse(
                "HEALTHCHECK_SCRIPT_TIMEOUT_SECS",
                "HEALTH_CHECK_SCRIPT_TIMEOUT_SECS",
                DEFAULT_HEALTH_TIMEOUT_SECS,
            )),
            inspect_timeout: Duration::from_secs(get_env_with_fallback_parse(
                "HEALTHCHECK_INSPECT_TIMEOUT_SECS",
                "HEALTH_CHECK_INSPECT_TIMEOUT_SECS",
                DEFAULT_INSPECT_TIMEOUT_SECS,
            )),
            exec_program: get_env_with_fallback_or(
                "HEALTHCHECK_EXEC_PROGRAM",
                "HEALTH_CHECK_EXEC_PROGRAM",
                &defaults.exec_program,
            ),
            exec_target: get_env_with_fallback_or(
                "HEALTHCHECK_EXEC_TARGET",
                "HEALTH_CHECK_EXEC_TARGET",
                &defaults.exec_target,
            ),
            app_root: get_env_with_fallback_or(
                "HEALTHCHECK_APP_ROOT",
                "HEALTH_CHECK_APP_ROOT",
                &defaults.app_root,
            ),
            log_dir: get_env_with_fallback("HEALTHCHECK_LOG_DIR", "HEALTH_CHECK_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            containers: defaults.containers,
            services,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> HealthResult<()> {
        if self.health_timeout.is_zero() {
            return Err(HealthError::Config(
                "health script timeout must be at least 1 second".to_string(),
            ));
        }
        if self.inspect_timeout.is_zero() {
            return Err(HealthError::Config(
                "inspection timeout must be at least 1 second".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for service in &self.services {
            if service.key.trim().is_empty() {
                return Err(HealthError::Config(
                    "service key must not be empty".to_string(),
                ));
            }
            if !service
                .key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(HealthError::Config(format!(
                    "service key '{}' may only contain ASCII letters, digits, '-' and '_'",
                    service.key
                )));
            }
            if service.log_file.contains(['"', '$', '`', '\\']) {
                return Err(HealthError::Config(format!(
                    "log file of service '{}' contains shell metacharacters",
                    service.key
                )));
            }
            if !seen.insert(service.key.as_str()) {
                return Err(HealthError::Config(format!(
                    "duplicate service key '{}'",
                    service.key
                )));
            }
        }
        Ok(())
    }

    /// Bind address string (`host:port`)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL used in startup logs
    pub fn base_url(&self) -> String {
        format!("http://{}", self.bind_addr())
    }

    /// Health script timeout in whole seconds, for messages
    pub fn health_timeout_secs(&self) -> u64 {
        self.health_timeout.as_secs().max(1)
    }
}

fn load_services_file(path: &PathBuf) -> HealthResult<Vec<ServiceDescriptor>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        HealthError::Config(format!(
            "failed to read services file {}: {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        HealthError::Config(format!(
            "failed to parse services file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Front-line containers of the SMS stack
pub fn default_containers() -> Vec<ContainerDescriptor> {
    vec![
        ContainerDescriptor {
            key: "sms_backend".to_string(),
            name: "SMS Backend API".to_string(),
            port: 8900,
            health_endpoint: Some("/health".to_string()),
            description: "FastAPI backend with authentication and SMS processing".to_string(),
        },
        ContainerDescriptor {
            key: "sms_frontend".to_string(),
            name: "SMS Frontend".to_string(),
            port: 8082,
            health_endpoint: None,
            description: "React frontend application".to_string(),
        },
        ContainerDescriptor {
            key: "nginx_proxy".to_string(),
            name: "Nginx Reverse Proxy".to_string(),
            port: 80,
            health_endpoint: None,
            description: "Routes requests between frontend and backend".to_string(),
        },
    ]
}

/// Background workers running inside the backend container
pub fn default_services() -> Vec<ServiceDescriptor> {
    vec![
        ServiceDescriptor::new(
            "scheduled-messages",
            "📨 Scheduled Messages Service",
            "Sends scheduled SMS messages every 60 seconds",
            "scripts/scheduler_runner.py",
            "logs/scheduled_messages.log",
        ),
        ServiceDescriptor::new(
            "ai-processor",
            "🤖 AI Response Processor",
            "Processes inbound messages for auto-responses using OpenAI",
            "scripts/ai_processor_runner.py",
            "logs/ai_processor.log",
        ),
    ]
}
