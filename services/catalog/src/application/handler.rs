//! Business logic handler
//!
//! 控制器层逻辑：校验、存在性检查、把“不存在”转换为 `NotFound`。

use std::sync::Arc;

use errors::{AppError, AppResult};
use tracing::info;

use crate::domain::{Category, CategoryRepository, Product, ProductRepository};

use super::queries::SearchProductsQuery;

pub struct CatalogHandler {
    product_repo: Arc<dyn ProductRepository>,
    category_repo: Arc<dyn CategoryRepository>,
}

impl CatalogHandler {
    pub fn new(
        product_repo: Arc<dyn ProductRepository>,
        category_repo: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            product_repo,
            category_repo,
        }
    }

    // ========== 商品 ==========

    /// 搜索商品
    pub async fn search_products(&self, query: SearchProductsQuery) -> AppResult<Vec<Product>> {
        let filter = query.into_filter();
        self.product_repo.search(&filter).await
    }

    pub async fn get_product(&self, product_id: i32) -> AppResult<Product> {
        self.product_repo
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {} not found", product_id)))
    }

    /// 创建商品
    pub async fn create_product(&self, product: Product) -> AppResult<Product> {
        product.validate()?;

        let created = self.product_repo.create(&product).await?;
        info!(product_id = created.product_id, "Product created");

        Ok(created)
    }

    /// 更新商品（不检查是否存在）
    pub async fn update_product(&self, product_id: i32, product: Product) -> AppResult<()> {
        product.validate()?;

        self.product_repo.update(product_id, &product).await?;
        info!(product_id, "Product updated");

        Ok(())
    }

    pub async fn delete_product(&self, product_id: i32) -> AppResult<()> {
        self.get_product(product_id).await?;

        self.product_repo.delete(product_id).await?;
        info!(product_id, "Product deleted");

        Ok(())
    }

    // ========== 分类 ==========

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.category_repo.get_all().await
    }

    pub async fn get_category(&self, category_id: i32) -> AppResult<Category> {
        self.category_repo
            .get_by_id(category_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {} not found", category_id)))
    }

    /// 列出分类下的商品，分类不存在时返回 `NotFound`
    pub async fn list_products_in_category(&self, category_id: i32) -> AppResult<Vec<Product>> {
        self.get_category(category_id).await?;

        self.product_repo.list_by_category_id(category_id).await
    }

    pub async fn create_category(&self, category: Category) -> AppResult<Category> {
        category.validate()?;

        let created = self.category_repo.create(&category).await?;
        info!(category_id = created.category_id, "Category created");

        Ok(created)
    }

    /// 更新分类
    ///
    /// 请求体中的 ID 为 0 时沿用路径 ID；非 0 且与路径不一致则拒绝。
    pub async fn update_category(&self, category_id: i32, category: Category) -> AppResult<()> {
        let category = match category.category_id {
            0 => category.with_id(category_id),
            id if id == category_id => category,
            id => {
                return Err(AppError::validation(format!(
                    "Category id {} in body does not match path id {}",
                    id, category_id
                )));
            }
        };
        category.validate()?;

        self.get_category(category_id).await?;

        self.category_repo.update(category_id, &category).await?;
        info!(category_id, "Category updated");

        Ok(())
    }

    pub async fn delete_category(&self, category_id: i32) -> AppResult<()> {
        self.get_category(category_id).await?;

        self.category_repo.delete(category_id).await?;
        info!(category_id, "Category deleted");

        Ok(())
    }
}
