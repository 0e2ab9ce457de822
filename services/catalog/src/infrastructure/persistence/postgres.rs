//! PostgreSQL repository implementation

use async_trait::async_trait;
use errors::{AppError, AppResult};
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{Category, CategoryRepository, FilterSpec, Product, ProductRepository};

use super::executor::{PgExecutor, StatementExecutor};
use super::query;
use super::row::{RowAccess, category_from_row, product_from_row};

/// 插入成功但没有拿到存储生成的主键
#[derive(Debug, Error)]
#[error("insert into {table} returned no generated {column}")]
pub struct MissingGeneratedKey {
    pub table: &'static str,
    pub column: &'static str,
}

async fn insert_returning_id<E: StatementExecutor>(
    executor: &E,
    statement: &query::Statement,
    table: &'static str,
    column: &'static str,
) -> AppResult<i32> {
    let row = executor.fetch_optional(statement).await?.ok_or_else(|| {
        AppError::persistence(
            format!("Insert into {} succeeded but no id was returned", table),
            MissingGeneratedKey { table, column },
        )
    })?;

    row.get_int(column)
}

// ============================================================================
// ProductRepository 实现
// ============================================================================

pub struct PostgresProductRepository<E = PgExecutor> {
    executor: E,
}

impl PostgresProductRepository<PgExecutor> {
    pub fn new(pool: PgPool) -> Self {
        Self::with_executor(PgExecutor::new(pool))
    }
}

impl<E: StatementExecutor> PostgresProductRepository<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl<E: StatementExecutor> ProductRepository for PostgresProductRepository<E> {
    #[instrument(skip(self))]
    async fn search(&self, filter: &FilterSpec) -> AppResult<Vec<Product>> {
        let statement = query::search_products(filter);
        let rows = self.executor.fetch_all(&statement).await?;

        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, product_id: i32) -> AppResult<Option<Product>> {
        let statement = query::select_product_by_id(product_id);
        let row = self.executor.fetch_optional(&statement).await?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_category_id(&self, category_id: i32) -> AppResult<Vec<Product>> {
        self.search(&FilterSpec::by_category(category_id)).await
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create(&self, product: &Product) -> AppResult<Product> {
        let statement = query::insert_product(product);
        let product_id =
            insert_returning_id(&self.executor, &statement, "products", "product_id").await?;

        debug!(product_id, "Product created");
        Ok(product.clone().with_id(product_id))
    }

    #[instrument(skip(self, product))]
    async fn update(&self, product_id: i32, product: &Product) -> AppResult<()> {
        let statement = query::update_product(product_id, product);
        let affected = self.executor.execute(&statement).await?;

        debug!(product_id, affected, "Product updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, product_id: i32) -> AppResult<()> {
        let statement = query::delete_product(product_id);
        let affected = self.executor.execute(&statement).await?;

        debug!(product_id, affected, "Product deleted");
        Ok(())
    }
}

// ============================================================================
// CategoryRepository 实现
// ============================================================================

pub struct PostgresCategoryRepository<E = PgExecutor> {
    executor: E,
}

impl PostgresCategoryRepository<PgExecutor> {
    pub fn new(pool: PgPool) -> Self {
        Self::with_executor(PgExecutor::new(pool))
    }
}

impl<E: StatementExecutor> PostgresCategoryRepository<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl<E: StatementExecutor> CategoryRepository for PostgresCategoryRepository<E> {
    #[instrument(skip(self))]
    async fn get_all(&self) -> AppResult<Vec<Category>> {
        let rows = self.executor.fetch_all(&query::select_categories()).await?;

        rows.iter().map(category_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, category_id: i32) -> AppResult<Option<Category>> {
        let statement = query::select_category_by_id(category_id);
        let row = self.executor.fetch_optional(&statement).await?;

        row.as_ref().map(category_from_row).transpose()
    }

    #[instrument(skip(self, category), fields(name = %category.name))]
    async fn create(&self, category: &Category) -> AppResult<Category> {
        let statement = query::insert_category(category);
        let category_id =
            insert_returning_id(&self.executor, &statement, "categories", "category_id").await?;

        debug!(category_id, "Category created");
        Ok(category.clone().with_id(category_id))
    }

    #[instrument(skip(self, category))]
    async fn update(&self, category_id: i32, category: &Category) -> AppResult<()> {
        let statement = query::update_category(category_id, category);
        let affected = self.executor.execute(&statement).await?;

        debug!(category_id, affected, "Category updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, category_id: i32) -> AppResult<()> {
        let affected = self
            .executor
            .execute(&query::delete_category(category_id))
            .await?;

        debug!(category_id, affected, "Category deleted");
        Ok(())
    }
}
