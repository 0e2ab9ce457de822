//! Catalog queries

use rust_decimal::Decimal;

use crate::domain::FilterSpec;

/// 搜索商品查询（原始条件，尚未规范化）
#[derive(Debug, Clone, Default)]
pub struct SearchProductsQuery {
    pub category_id: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub color: Option<String>,
}

impl SearchProductsQuery {
    pub fn into_filter(self) -> FilterSpec {
        FilterSpec::normalize(self.category_id, self.min_price, self.max_price, self.color)
    }
}
