//! 版本化 schema 迁移
//!
//! 每个迁移在独立事务中执行并记录到迁移表；已应用迁移的 SQL
//! 被修改（校验和不一致）时拒绝启动。

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::{info, warn};

const MIGRATION_TABLE: &str = "_migrations";

// 同一数据库上并发启动的实例串行执行迁移
const MIGRATION_LOCK_KEY: i64 = 0x6561_7379_7368_6f70;

/// 迁移定义
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    /// 可包含多条语句
    pub up_sql: String,
    pub checksum: String,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, up_sql: impl Into<String>) -> Self {
        let up_sql = up_sql.into();
        let mut hasher = DefaultHasher::new();
        up_sql.hash(&mut hasher);

        Self {
            version,
            name: name.into(),
            checksum: format!("{:016x}", hasher.finish()),
            up_sql,
        }
    }
}

/// 一次迁移运行的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<i64>,
    pub skipped: Vec<i64>,
}

/// 已应用迁移与待执行迁移的比对结果
#[derive(Debug, PartialEq, Eq)]
enum Plan<'a> {
    Apply(&'a Migration),
    Skip(i64),
}

/// 按版本排序后决定每个迁移是执行还是跳过
fn plan<'a>(
    migrations: &'a [Migration],
    applied: &HashMap<i64, String>,
) -> AppResult<Vec<Plan<'a>>> {
    let mut sorted: Vec<&Migration> = migrations.iter().collect();
    sorted.sort_by_key(|m| m.version);

    sorted
        .into_iter()
        .map(|migration| match applied.get(&migration.version) {
            None => Ok(Plan::Apply(migration)),
            Some(checksum) if *checksum == migration.checksum => Ok(Plan::Skip(migration.version)),
            Some(_) => Err(AppError::configuration(format!(
                "Migration {} ({}) was modified after being applied",
                migration.version, migration.name
            ))),
        })
        .collect()
}

/// 迁移管理器
pub struct MigrationManager {
    pool: PgPool,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn init(&self) -> AppResult<()> {
        let create_sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                version BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                checksum VARCHAR(64) NOT NULL
            )
            "#,
            MIGRATION_TABLE
        );

        sqlx::query(&create_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to create migration table", e))?;
        Ok(())
    }

    async fn applied_checksums(&self) -> AppResult<HashMap<i64, String>> {
        let sql = format!("SELECT version, checksum FROM {}", MIGRATION_TABLE);
        let rows: Vec<(i64, String)> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to read applied migrations", e))?;

        Ok(rows.into_iter().collect())
    }

    async fn apply(&self, migration: &Migration) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::persistence("Failed to begin migration transaction", e))?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::persistence("Failed to take migration lock", e))?;

        // 持锁后复查，另一个实例可能刚刚执行过
        let check_sql = format!("SELECT version FROM {} WHERE version = $1", MIGRATION_TABLE);
        let existing: Option<(i64,)> = sqlx::query_as(&check_sql)
            .bind(migration.version)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::persistence("Failed to check migration", e))?;
        if existing.is_some() {
            warn!(version = migration.version, "Migration applied concurrently, skipping");
            return Ok(false);
        }

        sqlx::raw_sql(&migration.up_sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::persistence(format!("Failed to apply migration {}", migration.version), e)
            })?;

        let insert_sql = format!(
            "INSERT INTO {} (version, name, checksum) VALUES ($1, $2, $3)",
            MIGRATION_TABLE
        );
        sqlx::query(&insert_sql)
            .bind(migration.version)
            .bind(&migration.name)
            .bind(&migration.checksum)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::persistence("Failed to record migration", e))?;

        tx.commit()
            .await
            .map_err(|e| AppError::persistence("Failed to commit migration", e))?;

        info!(version = migration.version, name = %migration.name, "Migration applied");
        Ok(true)
    }

    /// 执行所有待处理的迁移，第一个失败即停止
    pub async fn migrate(&self, migrations: &[Migration]) -> AppResult<MigrationReport> {
        self.init().await?;

        let applied = self.applied_checksums().await?;
        let mut report = MigrationReport::default();

        for step in plan(migrations, &applied)? {
            match step {
                Plan::Skip(version) => report.skipped.push(version),
                Plan::Apply(migration) => {
                    if self.apply(migration).await? {
                        report.applied.push(migration.version);
                    } else {
                        report.skipped.push(migration.version);
                    }
                }
            }
        }

        Ok(report)
    }
}
