//! PostgreSQL 连接池

use std::str::FromStr;
use std::time::Duration;

use errors::{AppError, AppResult};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

/// 连接池配置
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    /// 上报给服务端的 `application_name`，便于在 `pg_stat_activity` 中区分服务
    pub application_name: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            application_name: None,
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }

    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    pub fn with_pool_size(mut self, min: u32, max: u32) -> Self {
        self.min_connections = min.min(max);
        self.max_connections = max;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    fn connect_options(&self) -> AppResult<PgConnectOptions> {
        let options = PgConnectOptions::from_str(&self.url)
            .map_err(|e| AppError::configuration(format!("Invalid database url: {}", e)))?;

        Ok(match &self.application_name {
            Some(name) => options.application_name(name),
            None => options,
        })
    }
}

/// 创建连接池（立即建立最小连接数）
pub async fn create_pool(config: &PostgresConfig) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect_with(config.connect_options()?)
        .await
        .map_err(|e| AppError::persistence("Failed to create pool", e))
}

/// 检查数据库连接
pub async fn check_connection(pool: &PgPool) -> AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| AppError::persistence("Database health check failed", e))?;
    Ok(())
}
