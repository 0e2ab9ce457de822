//! SQL 语句构建
//!
//! 纯函数：同样的输入总是得到逐字节相同的 SQL 与参数列表，值只通过
//! 位置参数（`$1..$n`）传递，从不拼进 SQL 文本。

use rust_decimal::Decimal;

use crate::domain::{Category, FilterSpec, Product};

/// 商品表全部列（查询顺序）
pub const PRODUCT_COLUMNS: &str =
    "product_id, name, price, category_id, description, color, stock, featured, image_url";

/// 分类表全部列
pub const CATEGORY_COLUMNS: &str = "category_id, name, description";

const PRODUCT_MUTABLE_COLUMNS: [&str; 8] = [
    "name",
    "price",
    "category_id",
    "description",
    "color",
    "stock",
    "featured",
    "image_url",
];

const CATEGORY_MUTABLE_COLUMNS: [&str; 2] = ["name", "description"];

/// 位置参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i32),
    /// 可空整数，`None` 绑定为 SQL NULL
    NullableInt(Option<i32>),
    Decimal(Decimal),
    Text(String),
    Bool(bool),
}

/// 参数化语句：SQL 文本与按占位符顺序排列的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    params: Vec<SqlParam>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }
}

/// 谓词描述：值存在时才贡献一个子句和一个参数
struct Predicate {
    clause: fn(usize) -> String,
    value: Option<SqlParam>,
}

fn search_predicates(filter: &FilterSpec) -> [Predicate; 4] {
    [
        Predicate {
            clause: |n| format!("category_id = ${}", n),
            value: filter.category_id.map(SqlParam::Int),
        },
        Predicate {
            clause: |n| format!("price >= ${}", n),
            value: filter.min_price.map(SqlParam::Decimal),
        },
        Predicate {
            clause: |n| format!("price <= ${}", n),
            value: filter.max_price.map(SqlParam::Decimal),
        },
        Predicate {
            clause: |n| format!("LOWER(color) = LOWER(${})", n),
            value: filter.color.clone().map(SqlParam::Text),
        },
    ]
}

/// 构建商品搜索语句
///
/// 子句固定按 分类、最低价、最高价、颜色 的顺序以 `AND` 连接；
/// 没有任何条件时返回不带 `WHERE` 的基础查询。
pub fn search_products(filter: &FilterSpec) -> Statement {
    let (clauses, params): (Vec<String>, Vec<SqlParam>) = search_predicates(filter)
        .into_iter()
        .filter_map(|p| p.value.map(|value| (p.clause, value)))
        .enumerate()
        .map(|(i, (clause, value))| (clause(i + 1), value))
        .unzip();

    let mut sql = format!("SELECT {} FROM products", PRODUCT_COLUMNS);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    Statement::new(sql, params)
}

pub fn select_product_by_id(product_id: i32) -> Statement {
    Statement::new(
        format!("SELECT {} FROM products WHERE product_id = $1", PRODUCT_COLUMNS),
        vec![SqlParam::Int(product_id)],
    )
}

pub fn insert_product(product: &Product) -> Statement {
    Statement::new(
        format!(
            "INSERT INTO products ({}) VALUES ({}) RETURNING product_id",
            PRODUCT_MUTABLE_COLUMNS.join(", "),
            placeholders(PRODUCT_MUTABLE_COLUMNS.len())
        ),
        product_params(product),
    )
}

pub fn update_product(product_id: i32, product: &Product) -> Statement {
    let mut params = product_params(product);
    params.push(SqlParam::Int(product_id));

    Statement::new(
        format!(
            "UPDATE products SET {} WHERE product_id = ${}",
            assignments(&PRODUCT_MUTABLE_COLUMNS),
            PRODUCT_MUTABLE_COLUMNS.len() + 1
        ),
        params,
    )
}

pub fn delete_product(product_id: i32) -> Statement {
    Statement::new(
        "DELETE FROM products WHERE product_id = $1",
        vec![SqlParam::Int(product_id)],
    )
}

pub fn select_categories() -> Statement {
    Statement::new(format!("SELECT {} FROM categories", CATEGORY_COLUMNS), vec![])
}

pub fn select_category_by_id(category_id: i32) -> Statement {
    Statement::new(
        format!("SELECT {} FROM categories WHERE category_id = $1", CATEGORY_COLUMNS),
        vec![SqlParam::Int(category_id)],
    )
}

pub fn insert_category(category: &Category) -> Statement {
    Statement::new(
        format!(
            "INSERT INTO categories ({}) VALUES ({}) RETURNING category_id",
            CATEGORY_MUTABLE_COLUMNS.join(", "),
            placeholders(CATEGORY_MUTABLE_COLUMNS.len())
        ),
        category_params(category),
    )
}

pub fn update_category(category_id: i32, category: &Category) -> Statement {
    let mut params = category_params(category);
    params.push(SqlParam::Int(category_id));

    Statement::new(
        format!(
            "UPDATE categories SET {} WHERE category_id = ${}",
            assignments(&CATEGORY_MUTABLE_COLUMNS),
            CATEGORY_MUTABLE_COLUMNS.len() + 1
        ),
        params,
    )
}

pub fn delete_category(category_id: i32) -> Statement {
    Statement::new(
        "DELETE FROM categories WHERE category_id = $1",
        vec![SqlParam::Int(category_id)],
    )
}

// 与 PRODUCT_MUTABLE_COLUMNS 顺序一致
fn product_params(product: &Product) -> Vec<SqlParam> {
    vec![
        SqlParam::Text(product.name.clone()),
        SqlParam::Decimal(product.price),
        SqlParam::NullableInt(Some(product.category_id).filter(|id| *id != 0)),
        SqlParam::Text(product.description.clone()),
        SqlParam::Text(product.color.clone()),
        SqlParam::Int(product.stock),
        SqlParam::Bool(product.is_featured),
        SqlParam::Text(product.image_url.clone()),
    ]
}

fn category_params(category: &Category) -> Vec<SqlParam> {
    vec![
        SqlParam::Text(category.name.clone()),
        SqlParam::Text(category.description.clone()),
    ]
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|n| format!("${}", n))
        .collect::<Vec<_>>()
        .join(", ")
}

fn assignments(columns: &[&str]) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", column, i + 1))
        .collect::<Vec<_>>()
        .join(", ")
}
