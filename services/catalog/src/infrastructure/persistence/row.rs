//! 结果行到领域对象的映射
//!
//! 映射函数只依赖 [`RowAccess`]，按列名读取，与具体驱动的行类型解耦。

use errors::{AppError, AppResult};
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::domain::{Category, Product};

/// 按列名读取的行访问接口
pub trait RowAccess {
    fn get_int(&self, column: &str) -> AppResult<i32>;

    fn get_opt_int(&self, column: &str) -> AppResult<Option<i32>>;

    fn get_string(&self, column: &str) -> AppResult<String>;

    fn get_opt_string(&self, column: &str) -> AppResult<Option<String>>;

    fn get_decimal(&self, column: &str) -> AppResult<Decimal>;

    fn get_bool(&self, column: &str) -> AppResult<bool>;
}

fn decode_error(column: &str, e: sqlx::Error) -> AppError {
    AppError::persistence(format!("Failed to decode column {}", column), e)
}

impl RowAccess for PgRow {
    fn get_int(&self, column: &str) -> AppResult<i32> {
        self.try_get(column).map_err(|e| decode_error(column, e))
    }

    fn get_opt_int(&self, column: &str) -> AppResult<Option<i32>> {
        self.try_get(column).map_err(|e| decode_error(column, e))
    }

    fn get_string(&self, column: &str) -> AppResult<String> {
        self.try_get(column).map_err(|e| decode_error(column, e))
    }

    fn get_opt_string(&self, column: &str) -> AppResult<Option<String>> {
        self.try_get(column).map_err(|e| decode_error(column, e))
    }

    fn get_decimal(&self, column: &str) -> AppResult<Decimal> {
        self.try_get(column).map_err(|e| decode_error(column, e))
    }

    fn get_bool(&self, column: &str) -> AppResult<bool> {
        self.try_get(column).map_err(|e| decode_error(column, e))
    }
}

/// 将一行转换为 Product
///
/// `category_id` 为 NULL 时映射为 0（未分类）；可空文本列映射为空串。
pub fn product_from_row<R: RowAccess + ?Sized>(row: &R) -> AppResult<Product> {
    Ok(Product {
        product_id: row.get_int("product_id")?,
        name: row.get_string("name")?,
        price: row.get_decimal("price")?,
        category_id: row.get_opt_int("category_id")?.unwrap_or(0),
        description: row.get_opt_string("description")?.unwrap_or_default(),
        color: row.get_opt_string("color")?.unwrap_or_default(),
        stock: row.get_int("stock")?,
        is_featured: row.get_bool("featured")?,
        image_url: row.get_opt_string("image_url")?.unwrap_or_default(),
    })
}

/// 将一行转换为 Category
pub fn category_from_row<R: RowAccess + ?Sized>(row: &R) -> AppResult<Category> {
    Ok(Category {
        category_id: row.get_int("category_id")?,
        name: row.get_string("name")?,
        description: row.get_opt_string("description")?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[derive(Clone)]
    enum Cell {
        Null,
        Int(i32),
        Text(&'static str),
        Decimal(Decimal),
        Bool(bool),
    }

    struct TestRow(HashMap<&'static str, Cell>);

    impl TestRow {
        fn cell(&self, column: &str) -> AppResult<&Cell> {
            self.0
                .get(column)
                .ok_or_else(|| AppError::persistence("missing column", format!("no column {}", column)))
        }
    }

    fn mismatch(column: &str) -> AppError {
        AppError::persistence("type mismatch", format!("column {}", column))
    }

    impl RowAccess for TestRow {
        fn get_int(&self, column: &str) -> AppResult<i32> {
            match self.cell(column)? {
                Cell::Int(v) => Ok(*v),
                _ => Err(mismatch(column)),
            }
        }

        fn get_opt_int(&self, column: &str) -> AppResult<Option<i32>> {
            match self.cell(column)? {
                Cell::Null => Ok(None),
                _ => self.get_int(column).map(Some),
            }
        }

        fn get_string(&self, column: &str) -> AppResult<String> {
            match self.cell(column)? {
                Cell::Text(v) => Ok(v.to_string()),
                _ => Err(mismatch(column)),
            }
        }

        fn get_opt_string(&self, column: &str) -> AppResult<Option<String>> {
            match self.cell(column)? {
                Cell::Null => Ok(None),
                _ => self.get_string(column).map(Some),
            }
        }

        fn get_decimal(&self, column: &str) -> AppResult<Decimal> {
            match self.cell(column)? {
                Cell::Decimal(v) => Ok(*v),
                _ => Err(mismatch(column)),
            }
        }

        fn get_bool(&self, column: &str) -> AppResult<bool> {
            match self.cell(column)? {
                Cell::Bool(v) => Ok(*v),
                _ => Err(mismatch(column)),
            }
        }
    }

    fn product_row() -> TestRow {
        TestRow(HashMap::from([
            ("product_id", Cell::Int(11)),
            ("name", Cell::Text("Headphones")),
            ("price", Cell::Decimal(dec!(79.90))),
            ("category_id", Cell::Int(1)),
            ("description", Cell::Text("Noise cancelling")),
            ("color", Cell::Text("Black")),
            ("stock", Cell::Int(12)),
            ("featured", Cell::Bool(true)),
            ("image_url", Cell::Text("headphones.jpg")),
        ]))
    }

    #[test]
    fn test_product_from_row() {
        let product = product_from_row(&product_row()).unwrap();

        assert_eq!(product.product_id, 11);
        assert_eq!(product.name, "Headphones");
        assert_eq!(product.price, dec!(79.90));
        assert_eq!(product.category_id, 1);
        assert_eq!(product.description, "Noise cancelling");
        assert_eq!(product.color, "Black");
        assert_eq!(product.stock, 12);
        assert!(product.is_featured);
        assert_eq!(product.image_url, "headphones.jpg");
    }

    #[test]
    fn test_null_category_maps_to_zero() {
        let mut row = product_row();
        row.0.insert("category_id", Cell::Null);
        row.0.insert("color", Cell::Null);

        let product = product_from_row(&row).unwrap();

        assert_eq!(product.category_id, 0);
        assert_eq!(product.color, "");
    }

    #[test]
    fn test_missing_column_is_persistence_failure() {
        let mut row = product_row();
        row.0.remove("featured");

        let err = product_from_row(&row).unwrap_err();

        assert!(err.is_persistence_failure());
    }

    #[test]
    fn test_category_from_row() {
        let row = TestRow(HashMap::from([
            ("category_id", Cell::Int(2)),
            ("name", Cell::Text("Fashion")),
            ("description", Cell::Null),
        ]));

        let category = category_from_row(&row).unwrap();

        assert_eq!(category.category_id, 2);
        assert_eq!(category.name, "Fashion");
        assert_eq!(category.description, "");
    }
}
