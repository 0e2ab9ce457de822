//! 领域层
//!
//! 商品与分类实体、搜索条件以及仓储接口

pub mod entities;
pub mod repositories;

pub use entities::*;
pub use repositories::*;
