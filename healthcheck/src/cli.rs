//! CLI module for healthcheck
//!
//! 設定は環境変数から読み込まれ、ここで指定したフラグが優先される。

use std::path::PathBuf;

use clap::Parser;

use crate::config::HealthConfig;

/// Local health check server for the SMS stack
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "healthcheck-server")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    HEALTHCHECK_HOST                  Bind address (default: 127.0.0.1)
    HEALTHCHECK_PORT                  Listen port (default: 8888)
    HEALTHCHECK_SCRIPT                Health check script path
    HEALTHCHECK_SCRIPT_TIMEOUT_SECS   Health script timeout (default: 15)
    HEALTHCHECK_INSPECT_TIMEOUT_SECS  Per-service inspection timeout (default: 10)
    HEALTHCHECK_EXEC_TARGET           Container used for inspection (default: sms_backend)
    HEALTHCHECK_LOG_DIR               Directory served by /logs (default: /app/logs)
    HEALTHCHECK_SERVICES_FILE         JSON file replacing the background services
    HEALTHCHECK_LOG_LEVEL             Log level (default: info)
    HEALTHCHECK_LOG_FORMAT            pretty | json (default: pretty)
    HEALTHCHECK_LOG_FILE_DIR          Write a daily rolling log file here
"#)]
pub struct Cli {
    /// Listen port
    #[arg(short, long, env = "HEALTHCHECK_PORT")]
    pub port: Option<u16>,

    /// Bind address
    #[arg(short = 'H', long, env = "HEALTHCHECK_HOST")]
    pub host: Option<String>,

    /// Health check script
    #[arg(short, long, env = "HEALTHCHECK_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Directory holding service log files
    #[arg(long, env = "HEALTHCHECK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, mut config: HealthConfig) -> HealthConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(script) = &self.script {
            config.script_path = script.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = log_dir.clone();
        }
        config
    }
}
