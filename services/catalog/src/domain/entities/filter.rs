//! 商品搜索条件
//!
//! 每个维度独立可选，缺省即不过滤该维度。

use rust_decimal::Decimal;

/// 规范化后的搜索条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub category_id: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub color: Option<String>,
}

impl FilterSpec {
    /// 规范化原始条件
    ///
    /// 空串或纯空白的颜色视为未指定；非空白颜色原样保留（不裁剪空白）。
    /// `min_price > max_price` 也照样接受，查询结果为空而不是报错。
    pub fn normalize(
        category_id: Option<i32>,
        min_price: Option<Decimal>,
        max_price: Option<Decimal>,
        color: Option<String>,
    ) -> Self {
        Self {
            category_id,
            min_price,
            max_price,
            color: color.filter(|c| !c.trim().is_empty()),
        }
    }

    /// 仅按分类过滤
    pub fn by_category(category_id: i32) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }
}
