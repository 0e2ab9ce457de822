//! 商品实体

use errors::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 与 `products` 表列宽一致
const NAME_MAX_CHARS: usize = 50;
const COLOR_MAX_CHARS: usize = 20;
const IMAGE_URL_MAX_CHARS: usize = 200;

// `NUMERIC(10, 2)`：两位小数，最大 99999999.99
const PRICE_SCALE: u32 = 2;
const PRICE_MAX: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// 商品
///
/// `product_id` 由存储分配，新建时为 0；`category_id` 为 0 表示未分类。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub product_id: i32,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category_id: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub image_url: String,
}

impl Product {
    /// 写入前的业务校验
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        if self.name.chars().count() > NAME_MAX_CHARS {
            return Err(AppError::validation(format!(
                "Product name must be at most {} characters",
                NAME_MAX_CHARS
            )));
        }
        if self.price < Decimal::ZERO {
            return Err(AppError::validation("Product price must not be negative"));
        }
        if self.price > PRICE_MAX {
            return Err(AppError::validation(format!(
                "Product price must not exceed {}",
                PRICE_MAX
            )));
        }
        // 多余的尾随零不算精度，10.500 与 10.50 等价
        if self.price.normalize().scale() > PRICE_SCALE {
            return Err(AppError::validation(format!(
                "Product price must have at most {} decimal places",
                PRICE_SCALE
            )));
        }
        if self.color.chars().count() > COLOR_MAX_CHARS {
            return Err(AppError::validation(format!(
                "Product color must be at most {} characters",
                COLOR_MAX_CHARS
            )));
        }
        if self.image_url.chars().count() > IMAGE_URL_MAX_CHARS {
            return Err(AppError::validation(format!(
                "Product image url must be at most {} characters",
                IMAGE_URL_MAX_CHARS
            )));
        }
        if self.stock < 0 {
            return Err(AppError::validation("Product stock must not be negative"));
        }
        Ok(())
    }

    /// 返回带有存储分配 ID 的副本
    pub fn with_id(mut self, product_id: i32) -> Self {
        self.product_id = product_id;
        self
    }
}
