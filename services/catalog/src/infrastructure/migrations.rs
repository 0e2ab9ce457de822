//! 目录服务的 schema 迁移

use adapter_postgres::Migration;

/// 按版本排列的全部迁移
pub fn migrations() -> Vec<Migration> {
    vec![Migration::new(
        1,
        "create_catalog",
        include_str!("../../migrations/0001_create_catalog.sql"),
    )]
}
