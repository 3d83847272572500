//! axumサーバー起動・シャットダウンハンドリング

use std::io::ErrorKind;
use std::path::Path;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::HealthConfig;
use crate::error::{HealthError, HealthResult};
use crate::probe::ProcessRunner;
use crate::AppState;

/// ヘルスチェックスクリプトの存在確認と実行権限の付与
///
/// スクリプトが無ければエラー。権限変更の失敗は警告のみ。
pub fn prepare_script(path: &Path) -> HealthResult<()> {
    if !path.exists() {
        return Err(HealthError::Config(format!(
            "Health check script not found: {}",
            path.display()
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(err) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)) {
            warn!(script = %path.display(), error = %err, "Failed to make health check script executable");
        }
    }

    Ok(())
}

/// 設定されたアドレスにバインドする
pub async fn bind(config: &HealthConfig) -> HealthResult<TcpListener> {
    TcpListener::bind(config.bind_addr())
        .await
        .map_err(|err| match err.kind() {
            ErrorKind::AddrInUse => {
                HealthError::Config(format!("Port {} is already in use", config.port))
            }
            _ => HealthError::Io(err),
        })
}

/// スクリプトを準備し、バインドしてシャットダウンまで処理を続ける
pub async fn run(config: HealthConfig, shutdown: CancellationToken) -> HealthResult<()> {
    prepare_script(&config.script_path)?;
    let listener = bind(&config).await?;

    let base_url = config.base_url();
    info!(
        addr = %config.bind_addr(),
        script = %config.script_path.display(),
        "🚀 Starting ALB Health Check Server"
    );
    info!("📍 Health check endpoint: {}/health-check", base_url);
    info!("📊 Status endpoint: {}/status", base_url);
    info!("🔧 Services detail endpoint: {}/services", base_url);
    info!("📜 Service logs endpoint: {}/logs/{{service-name}}", base_url);

    let state = AppState::new(config, std::sync::Arc::new(ProcessRunner));
    serve(listener, state, shutdown).await
}

/// 既にバインド済みのリスナーでサーバーを動かす
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> HealthResult<()> {
    let app = crate::api::create_app(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// シャットダウンシグナルを待機
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("🛑 Received SIGTERM, shutting down...");
        }
        _ = shutdown.cancelled() => {
            info!("Shutdown requested, shutting down...");
        }
    }
}
