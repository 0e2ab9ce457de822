//! telemetry - 可观测性库

use errors::{AppError, AppResult};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    /// 生产环境
    Json,
}

/// 耗时直方图的桶（毫秒）
const DURATION_MS_BUCKETS: &[f64] = &[1.0, 2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0];

/// 初始化 tracing，`RUST_LOG` 优先于 `log_level`
///
/// 全局 subscriber 只能安装一次，重复调用返回错误。
pub fn init_tracing(log_level: &str, format: LogFormat) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    result.map_err(|e| AppError::internal(format!("Failed to install tracing subscriber: {}", e)))
}

/// 初始化 Prometheus metrics
///
/// 返回的 handle 用于渲染 `/metrics`；`*_duration_ms` 指标按固定桶输出为直方图。
pub fn init_metrics() -> AppResult<PrometheusHandle> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Suffix("_duration_ms".to_string()), DURATION_MS_BUCKETS)
        .and_then(|builder| builder.install_recorder())
        .map_err(|e| AppError::internal(format!("Failed to install Prometheus recorder: {}", e)))
}
