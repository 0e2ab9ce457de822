//! 服务启动器
//!
//! 提供统一的 HTTP 服务启动模式

use std::future::Future;
use std::net::SocketAddr;

use adapter_postgres::Migration;
use axum::Router;
use config::AppConfig;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::infrastructure::Infrastructure;
use crate::ops::ops_routes;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 所有服务的统一入口点：
/// 1. 加载配置并初始化日志
/// 2. 安装 Prometheus recorder
/// 3. 创建基础设施资源（数据库连接带重试）并执行迁移
/// 4. 调用 `router_builder` 构建业务路由，合并 `/health` 与 `/metrics`
/// 5. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     bootstrap::run_http("config", MIGRATIONS, |infra| async move {
///         my_service::router(infra.postgres_pool(), infra.token_service())
///     })
///     .await
/// }
/// ```
pub async fn run_http<F, Fut>(
    config_dir: &str,
    migrations: &[Migration],
    router_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = Router>,
{
    let config = AppConfig::load(config_dir)?;

    init_runtime(&config)?;

    info!("Starting {} service", config.app_name);

    let metrics = match telemetry::init_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled");
            None
        }
    };

    let infra = Infrastructure::from_config(config.clone()).await?;
    infra.run_migrations(migrations).await?;

    let ops = ops_routes(infra.postgres_pool(), metrics);
    let app = router_builder(infra)
        .await
        .merge(ops)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");

    Ok(())
}
