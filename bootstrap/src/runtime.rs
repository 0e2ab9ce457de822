//! 服务运行时

use config::AppConfig;
use errors::AppResult;
use telemetry::{LogFormat, init_tracing};
use tracing::{info, warn};

/// 初始化服务运行时（日志）
pub fn init_runtime(config: &AppConfig) -> AppResult<()> {
    let format = if config.is_production() || config.telemetry.json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(&config.telemetry.log_level, format)?;

    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        "Runtime initialized"
    );
    Ok(())
}

/// 等待关闭信号（Ctrl+C / SIGTERM）
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
