//! 语句执行器
//!
//! 每次调用独立获取一个连接，作用域结束即归还连接池（成功、无结果、
//! 失败都一样）。驱动错误只在这里转换为 `AppError::PersistenceFailure`。

use std::time::Instant;

use async_trait::async_trait;
use errors::{AppError, AppResult};
use metrics::{counter, histogram};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};
use tracing::{debug, error};

use super::query::{SqlParam, Statement};
use super::row::RowAccess;

/// 执行参数化语句的存储接口
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    type Row: RowAccess + Send;

    /// 返回全部结果行（存储返回顺序）
    async fn fetch_all(&self, statement: &Statement) -> AppResult<Vec<Self::Row>>;

    /// 返回第一行（如果有）
    async fn fetch_optional(&self, statement: &Statement) -> AppResult<Option<Self::Row>>;

    /// 执行写语句，返回受影响行数
    async fn execute(&self, statement: &Statement) -> AppResult<u64>;
}

/// 基于 PostgreSQL 连接池的执行器
#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn acquire(&self) -> AppResult<PoolConnection<Postgres>> {
        self.pool.acquire().await.map_err(|e| {
            error!(error = %e, "Failed to acquire database connection");
            AppError::persistence("Failed to acquire database connection", e)
        })
    }
}

fn bind_params(statement: &Statement) -> Query<'_, Postgres, PgArguments> {
    statement
        .params()
        .iter()
        .fold(sqlx::query(statement.sql()), |query, param| match param {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::NullableInt(v) => query.bind(*v),
            SqlParam::Decimal(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.as_str()),
            SqlParam::Bool(v) => query.bind(*v),
        })
}

/// 语句计时器
struct StatementTimer {
    start: Instant,
    kind: &'static str,
}

impl StatementTimer {
    fn start(kind: &'static str, statement: &Statement) -> Self {
        debug!(kind, sql = statement.sql(), params = statement.params().len(), "Executing statement");
        Self {
            start: Instant::now(),
            kind,
        }
    }

    fn finish<T>(self, result: Result<T, sqlx::Error>, statement: &Statement) -> AppResult<T> {
        let duration = self.start.elapsed().as_secs_f64() * 1000.0;
        let success = result.is_ok();

        histogram!("catalog_db_statement_duration_ms", "kind" => self.kind).record(duration);
        counter!(
            "catalog_db_statements_total",
            "kind" => self.kind,
            "success" => success.to_string()
        )
        .increment(1);

        result.map_err(|e| {
            error!(kind = self.kind, sql = statement.sql(), error = %e, "Statement failed");
            AppError::persistence(format!("Failed to execute {} statement", self.kind), e)
        })
    }
}

#[async_trait]
impl StatementExecutor for PgExecutor {
    type Row = PgRow;

    async fn fetch_all(&self, statement: &Statement) -> AppResult<Vec<PgRow>> {
        let mut conn = self.acquire().await?;
        let timer = StatementTimer::start("fetch_all", statement);
        let result = bind_params(statement).fetch_all(&mut *conn).await;
        timer.finish(result, statement)
    }

    async fn fetch_optional(&self, statement: &Statement) -> AppResult<Option<PgRow>> {
        let mut conn = self.acquire().await?;
        let timer = StatementTimer::start("fetch_optional", statement);
        let result = bind_params(statement).fetch_optional(&mut *conn).await;
        timer.finish(result, statement)
    }

    async fn execute(&self, statement: &Statement) -> AppResult<u64> {
        let mut conn = self.acquire().await?;
        let timer = StatementTimer::start("execute", statement);
        let result = bind_params(statement).execute(&mut *conn).await;
        timer.finish(result.map(|done| done.rows_affected()), statement)
    }
}
