//! 基础设施资源管理
//!
//! 统一管理服务共享的基础设施资源

use std::sync::Arc;
use std::time::Duration;

use adapter_postgres::{Migration, MigrationManager, PostgresConfig, create_pool};
use auth_core::TokenService;
use config::AppConfig;
use errors::AppResult;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use crate::retry::{RetryConfig, with_retry};

/// 基础设施资源容器
#[derive(Clone)]
pub struct Infrastructure {
    config: Arc<AppConfig>,
    postgres_pool: PgPool,
    token_service: Arc<TokenService>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（数据库连接带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let retry_config = RetryConfig::default();

        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_application_name(&config.app_name)
            .with_pool_size(config.database.min_connections, config.database.max_connections)
            .with_acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs));
        let postgres_pool = with_retry(&retry_config, "PostgreSQL connection", || {
            let cfg = pg_config.clone();
            async move { create_pool(&cfg).await }
        })
        .await?;
        info!(
            max_connections = config.database.max_connections,
            "PostgreSQL connection pool created"
        );

        let token_service = Arc::new(TokenService::new(
            config.jwt.secret.expose_secret(),
            config.jwt.expires_in as i64,
            config.jwt.issuer.clone(),
            config.jwt.audience.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            postgres_pool,
            token_service,
        })
    }

    /// 按配置执行服务自带的 schema 迁移
    pub async fn run_migrations(&self, migrations: &[Migration]) -> AppResult<()> {
        if !self.config.database.run_migrations {
            info!("Schema migrations disabled");
            return Ok(());
        }

        let report = MigrationManager::new(self.postgres_pool.clone())
            .migrate(migrations)
            .await?;

        info!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "Schema migrations complete"
        );
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    pub fn token_service(&self) -> Arc<TokenService> {
        self.token_service.clone()
    }
}
