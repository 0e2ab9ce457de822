//! catalog - 商品目录服务
//!
//! 商品搜索、商品与分类的增删改查，基于 PostgreSQL。

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
