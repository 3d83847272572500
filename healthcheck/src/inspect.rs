//! バックグラウンドサービス調査プロトコル
//!
//! 対象コンテナ内で1行のシェルスニペットを実行し、`|` 区切りの `KEY:VALUE`
//! 形式で返ってきた出力をパースする。
//!
//! ```text
//! PROCESS:running|PID:123|LOG_EXISTS:true|LOG_SIZE:2048|LOG_MODIFIED:2025-01-01 10:00:00|RECENT:a|b|c
//! ```
//!
//! `RECENT` はログ末尾の行を `|` で連結したもので、常に最後のフィールドになる。
//! ログ行そのものに `|` が含まれる場合は別の行として分割される（既知の制約）。

use crate::config::HealthConfig;
use crate::types::{ProcessState, ServiceDescriptor};

/// Maximum number of recent log lines kept
pub const MAX_RECENT_LINES: usize = 3;

const RECENT_MARKER: &str = "RECENT:";

/// Build the shell snippet that inspects one background service.
///
/// The snippet checks `{log_dir}/{key}.pid` and `{app_root}/{log_file}` inside the
/// target and prints exactly one protocol line.
pub fn inspection_script(config: &HealthConfig, service: &ServiceDescriptor) -> String {
    let pid_file = format!("{}/{}.pid", config.log_dir.display(), service.key);
    let log_file = format!(
        "{}/{}",
        config.app_root.trim_end_matches('/'),
        service.log_file
    );

    format!(
        r#"
pid_file="{pid_file}"
log_file="{log_file}"

if [ -f "$pid_file" ]; then
    pid=$(cat "$pid_file" 2>/dev/null)
    if [ ! -z "$pid" ] && kill -0 "$pid" 2>/dev/null; then
        process_status="running"
    else
        process_status="stopped"
    fi
    process_pid="$pid"
else
    process_status="not_started"
    process_pid=""
fi

if [ -f "$log_file" ]; then
    log_size=$(stat -c%s "$log_file" 2>/dev/null || echo "0")
    log_modified=$(stat -c "%y" "$log_file" 2>/dev/null | cut -d'.' -f1 || echo "unknown")
    recent_logs=$(tail -n {MAX_RECENT_LINES} "$log_file" 2>/dev/null | tr '\n' '|' | sed 's/|$//' || echo "")
    log_exists="true"
else
    log_size="0"
    log_modified="unknown"
    recent_logs=""
    log_exists="false"
fi

echo "PROCESS:$process_status|PID:$process_pid|LOG_EXISTS:$log_exists|LOG_SIZE:$log_size|LOG_MODIFIED:$log_modified|RECENT:$recent_logs"
"#
    )
}

/// Full argument list for `exec_program`: `exec <target> sh -c <snippet>`.
pub fn inspection_args(config: &HealthConfig, service: &ServiceDescriptor) -> Vec<String> {
    vec![
        "exec".to_string(),
        config.exec_target.clone(),
        "sh".to_string(),
        "-c".to_string(),
        inspection_script(config, service),
    ]
}

/// Parsed inspection line. Missing or malformed fields hold their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionReport {
    /// `PROCESS`
    pub process: ProcessState,
    /// `PID`; empty values become `None`
    pub pid: Option<String>,
    /// `LOG_EXISTS`
    pub log_exists: bool,
    /// `LOG_SIZE`
    pub log_size: u64,
    /// `LOG_MODIFIED`
    pub log_modified: String,
    /// Last non-empty lines of `RECENT`, most recent last
    pub recent: Vec<String>,
}

impl Default for InspectionReport {
    fn default() -> Self {
        Self {
            process: ProcessState::Unknown,
            pid: None,
            log_exists: false,
            log_size: 0,
            log_modified: "unknown".to_string(),
            recent: Vec::new(),
        }
    }
}

/// Parse the inspection output. Never fails; see [`InspectionReport`] defaults.
pub fn parse_inspection(output: &str) -> InspectionReport {
    let line = output.trim();
    let mut report = InspectionReport::default();

    let (fields, recent) = match find_recent_marker(line) {
        Some(idx) => (&line[..idx], Some(&line[idx + RECENT_MARKER.len()..])),
        None => (line, None),
    };

    for part in fields.split('|') {
        let Some((key, value)) = part.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "PROCESS" => report.process = ProcessState::from_probe_value(value),
            "PID" => report.pid = (!value.is_empty()).then(|| value.to_string()),
            "LOG_EXISTS" => report.log_exists = value == "true",
            "LOG_SIZE" => report.log_size = value.parse().unwrap_or(0),
            "LOG_MODIFIED" if !value.is_empty() => report.log_modified = value.to_string(),
            _ => {}
        }
    }

    if let Some(recent) = recent {
        report.recent = last_lines(recent.split('|'), MAX_RECENT_LINES);
    }

    report
}

/// Keep the last `max` non-empty trimmed lines, in original order.
pub fn last_lines<'a>(lines: impl Iterator<Item = &'a str>, max: usize) -> Vec<String> {
    let lines: Vec<&str> = lines.map(str::trim).filter(|l| !l.is_empty()).collect();
    let skip = lines.len().saturating_sub(max);
    lines[skip..].iter().map(|l| l.to_string()).collect()
}

/// Byte index of the `RECENT:` field, which must start a `|`-separated field.
fn find_recent_marker(line: &str) -> Option<usize> {
    if line.starts_with(RECENT_MARKER) {
        return Some(0);
    }
    line.find(&format!("|{RECENT_MARKER}")).map(|idx| idx + 1)
}
