//! 查询参数

use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de};

use crate::application::SearchProductsQuery;

/// `GET /products` 的查询参数
///
/// 空值（如 `?cat=`）等同于未提供。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchParams {
    #[serde(default, rename = "cat", deserialize_with = "empty_as_none")]
    pub category_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub color: Option<String>,
}

impl From<ProductSearchParams> for SearchProductsQuery {
    fn from(params: ProductSearchParams) -> Self {
        Self {
            category_id: params.category_id,
            min_price: params.min_price,
            max_price: params.max_price,
            color: params.color,
        }
    }
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}
