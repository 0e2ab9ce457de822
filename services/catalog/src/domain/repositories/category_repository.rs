//! 分类仓储接口

use async_trait::async_trait;
use errors::AppResult;

use crate::domain::entities::Category;

/// 分类仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn get_all(&self) -> AppResult<Vec<Category>>;

    async fn get_by_id(&self, category_id: i32) -> AppResult<Option<Category>>;

    async fn create(&self, category: &Category) -> AppResult<Category>;

    async fn update(&self, category_id: i32, category: &Category) -> AppResult<()>;

    async fn delete(&self, category_id: i32) -> AppResult<()>;
}
