//! 商品仓储接口

use async_trait::async_trait;
use errors::AppResult;

use crate::domain::entities::{FilterSpec, Product};

/// 商品仓储接口
///
/// 所有存储层失败统一返回 `AppError::PersistenceFailure`，仓储内部不做重试。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 按条件搜索，结果顺序即存储返回顺序
    async fn search(&self, filter: &FilterSpec) -> AppResult<Vec<Product>>;

    /// 根据 ID 查找，不存在时返回 `None`
    async fn get_by_id(&self, product_id: i32) -> AppResult<Option<Product>>;

    /// 列出分类下的商品
    async fn list_by_category_id(&self, category_id: i32) -> AppResult<Vec<Product>>;

    /// 新建商品，返回带存储分配 ID 的商品
    async fn create(&self, product: &Product) -> AppResult<Product>;

    /// 更新商品（不检查存在性）
    async fn update(&self, product_id: i32, product: &Product) -> AppResult<()>;

    /// 删除商品（不存在也视为成功）
    async fn delete(&self, product_id: i32) -> AppResult<()>;
}
