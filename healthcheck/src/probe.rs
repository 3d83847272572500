//! 外部コマンド実行アダプター
//!
//! ヘルスチェックスクリプトとサービス調査コマンドをタイムアウト付きで実行し、
//! 結果を [`ProbeOutcome`] に閉じ込める。どの失敗（非ゼロ終了・タイムアウト・
//! コマンド未検出・I/Oエラー）も呼び出し側に `Err` として漏らさない。

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Result of one bounded external command run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Exited with status 0
    pub succeeded: bool,
    /// Exit status, if the process exited normally
    pub exit_code: Option<i32>,
    /// Captured stdout (lossy UTF-8)
    pub stdout: String,
    /// Captured stderr (lossy UTF-8)
    pub stderr: String,
    /// The time bound was exceeded and the process was killed
    pub timed_out: bool,
    /// The process could not be started or its output could not be collected
    pub launch_error: Option<String>,
}

impl ProbeOutcome {
    /// Outcome of a process that ran to completion.
    pub fn exited(exit_code: Option<i32>, stdout: String, stderr: String) -> Self {
        Self {
            succeeded: exit_code == Some(0),
            exit_code,
            stdout,
            stderr,
            timed_out: false,
            launch_error: None,
        }
    }

    /// Outcome of a process that exceeded its time bound.
    pub fn timeout() -> Self {
        Self {
            timed_out: true,
            ..Self::default()
        }
    }

    /// Outcome of a process that could not be run.
    pub fn launch_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            stderr: message.clone(),
            launch_error: Some(message),
            ..Self::default()
        }
    }

    /// Trimmed stdout
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Trimmed stderr, `None` when empty
    pub fn stderr_trimmed(&self) -> Option<&str> {
        let trimmed = self.stderr.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Runs external commands under a time bound.
///
/// Implementations must never panic or return an error: every failure is
/// reported through the returned [`ProbeOutcome`].
#[async_trait]
pub trait CommandRunner: Send + Sync + 'static {
    /// Run `program args...`, waiting at most `limit`.
    async fn run(&self, program: &str, args: &[String], limit: Duration) -> ProbeOutcome;
}

/// [`CommandRunner`] backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String], limit: Duration) -> ProbeOutcome {
        run_external(program, args, limit).await
    }
}

/// Run an external command with a bounded wait.
///
/// On timeout the child is killed (`kill_on_drop`) and a timed-out outcome is
/// returned.
pub async fn run_external(program: &str, args: &[String], limit: Duration) -> ProbeOutcome {
    let child = match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(err) => {
            debug!(program, error = %err, "failed to spawn probe command");
            return ProbeOutcome::launch_failed(format!("failed to run {program}: {err}"));
        }
    };

    match timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => ProbeOutcome::exited(
            output.status.code(),
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
        ),
        Ok(Err(err)) => {
            debug!(program, error = %err, "failed to collect probe output");
            ProbeOutcome::launch_failed(format!("failed to read output of {program}: {err}"))
        }
        Err(_) => {
            debug!(
                program,
                limit_ms = limit.as_millis() as u64,
                "probe command timed out"
            );
            ProbeOutcome::timeout()
        }
    }
}
