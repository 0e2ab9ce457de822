//! 测试公共设施
//!
//! `MemoryExecutor` 解释仓储生成的参数化 SQL（仅限本服务用到的语句形状），
//! 在内存表上执行，用于端到端验证子句与参数的对应关系。

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use catalog::domain::{Category, Product};
use catalog::infrastructure::persistence::{RowAccess, SqlParam, Statement, StatementExecutor};
use errors::{AppError, AppResult};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum MemoryValue {
    Null,
    Int(i32),
    Decimal(Decimal),
    Text(String),
    Bool(bool),
}

impl From<&SqlParam> for MemoryValue {
    fn from(param: &SqlParam) -> Self {
        match param {
            SqlParam::Int(v) => Self::Int(*v),
            SqlParam::NullableInt(Some(v)) => Self::Int(*v),
            SqlParam::NullableInt(None) => Self::Null,
            SqlParam::Decimal(v) => Self::Decimal(*v),
            SqlParam::Text(v) => Self::Text(v.clone()),
            SqlParam::Bool(v) => Self::Bool(*v),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRow(HashMap<String, MemoryValue>);

impl MemoryRow {
    fn value(&self, column: &str) -> AppResult<&MemoryValue> {
        self.0
            .get(column)
            .ok_or_else(|| AppError::persistence("Failed to decode row", format!("no column {}", column)))
    }

    fn project(&self, columns: &[&str]) -> AppResult<Self> {
        let mut projected = HashMap::new();
        for column in columns {
            projected.insert(column.to_string(), self.value(column)?.clone());
        }
        Ok(Self(projected))
    }
}

fn mismatch(column: &str, value: &MemoryValue) -> AppError {
    AppError::persistence(
        "Failed to decode row",
        format!("column {} holds {:?}", column, value),
    )
}

impl RowAccess for MemoryRow {
    fn get_int(&self, column: &str) -> AppResult<i32> {
        match self.value(column)? {
            MemoryValue::Int(v) => Ok(*v),
            other => Err(mismatch(column, other)),
        }
    }

    fn get_opt_int(&self, column: &str) -> AppResult<Option<i32>> {
        match self.value(column)? {
            MemoryValue::Null => Ok(None),
            _ => self.get_int(column).map(Some),
        }
    }

    fn get_string(&self, column: &str) -> AppResult<String> {
        match self.value(column)? {
            MemoryValue::Text(v) => Ok(v.clone()),
            other => Err(mismatch(column, other)),
        }
    }

    fn get_opt_string(&self, column: &str) -> AppResult<Option<String>> {
        match self.value(column)? {
            MemoryValue::Null => Ok(None),
            _ => self.get_string(column).map(Some),
        }
    }

    fn get_decimal(&self, column: &str) -> AppResult<Decimal> {
        match self.value(column)? {
            MemoryValue::Decimal(v) => Ok(*v),
            other => Err(mismatch(column, other)),
        }
    }

    fn get_bool(&self, column: &str) -> AppResult<bool> {
        match self.value(column)? {
            MemoryValue::Bool(v) => Ok(*v),
            other => Err(mismatch(column, other)),
        }
    }
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<MemoryRow>,
    next_id: i32,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, Table>,
    statements: Vec<Statement>,
    fail_next: Option<String>,
    suppress_generated_key: bool,
}

/// 内存语句执行器
#[derive(Clone, Default)]
pub struct MemoryExecutor {
    state: Arc<Mutex<State>>,
}

fn primary_key(table: &str) -> &'static str {
    match table {
        "products" => "product_id",
        _ => "category_id",
    }
}

fn bad_sql(sql: &str) -> AppError {
    AppError::persistence("Failed to execute statement", format!("unsupported statement: {}", sql))
}

fn param(statement: &Statement, placeholder: &str) -> AppResult<MemoryValue> {
    placeholder
        .trim()
        .strip_prefix('$')
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| statement.params().get(i))
        .map(MemoryValue::from)
        .ok_or_else(|| bad_sql(statement.sql()))
}

fn compare(left: &MemoryValue, op: &str, right: &MemoryValue) -> bool {
    use std::cmp::Ordering;

    let ordering = match (left, right) {
        (MemoryValue::Int(a), MemoryValue::Int(b)) => a.cmp(b),
        (MemoryValue::Decimal(a), MemoryValue::Decimal(b)) => a.cmp(b),
        (MemoryValue::Text(a), MemoryValue::Text(b)) => a.cmp(b),
        (MemoryValue::Bool(a), MemoryValue::Bool(b)) => a.cmp(b),
        // NULL 与任何值比较都不成立
        _ => return false,
    };

    match op {
        "=" => ordering == Ordering::Equal,
        ">=" => ordering != Ordering::Less,
        "<=" => ordering != Ordering::Greater,
        _ => false,
    }
}

/// 解析并求值 `WHERE` 子句（以 ` AND ` 连接）
fn matches(row: &MemoryRow, predicate: Option<&str>, statement: &Statement) -> AppResult<bool> {
    let Some(predicate) = predicate else {
        return Ok(true);
    };

    for clause in predicate.split(" AND ") {
        let holds = if let Some(rest) = clause.strip_prefix("LOWER(") {
            let (column, rest) = rest.split_once(") = LOWER(").ok_or_else(|| bad_sql(clause))?;
            let placeholder = rest.strip_suffix(')').ok_or_else(|| bad_sql(clause))?;
            match (row.value(column)?, param(statement, placeholder)?) {
                (MemoryValue::Text(a), MemoryValue::Text(b)) => a.to_lowercase() == b.to_lowercase(),
                _ => false,
            }
        } else {
            let parts: Vec<&str> = clause.split_whitespace().collect();
            let [column, op, placeholder] = parts.as_slice() else {
                return Err(bad_sql(clause));
            };
            compare(row.value(column)?, op, &param(statement, placeholder)?)
        };

        if !holds {
            return Ok(false);
        }
    }

    Ok(true)
}

fn split_where(sql: &str) -> (&str, Option<&str>) {
    match sql.split_once(" WHERE ") {
        Some((head, predicate)) => (head, Some(predicate)),
        None => (sql, None),
    }
}

fn between<'a>(s: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = s.find(open)? + open.len();
    let end = s[start..].find(close)? + start;
    Some(&s[start..end])
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// 直接写入一行商品（不经过语句），返回分配的 ID
    pub fn seed_product(&self, product: &Product) -> i32 {
        let mut state = self.lock();
        let table = state.tables.entry("products".to_string()).or_default();
        table.next_id += 1;
        let id = table.next_id;

        let category = match product.category_id {
            0 => MemoryValue::Null,
            c => MemoryValue::Int(c),
        };
        table.rows.push(MemoryRow(HashMap::from([
            ("product_id".to_string(), MemoryValue::Int(id)),
            ("name".to_string(), MemoryValue::Text(product.name.clone())),
            ("price".to_string(), MemoryValue::Decimal(product.price)),
            ("category_id".to_string(), category),
            ("description".to_string(), MemoryValue::Text(product.description.clone())),
            ("color".to_string(), MemoryValue::Text(product.color.clone())),
            ("stock".to_string(), MemoryValue::Int(product.stock)),
            ("featured".to_string(), MemoryValue::Bool(product.is_featured)),
            ("image_url".to_string(), MemoryValue::Text(product.image_url.clone())),
        ])));
        id
    }

    pub fn seed_category(&self, category: &Category) -> i32 {
        let mut state = self.lock();
        let table = state.tables.entry("categories".to_string()).or_default();
        table.next_id += 1;
        let id = table.next_id;

        table.rows.push(MemoryRow(HashMap::from([
            ("category_id".to_string(), MemoryValue::Int(id)),
            ("name".to_string(), MemoryValue::Text(category.name.clone())),
            ("description".to_string(), MemoryValue::Text(category.description.clone())),
        ])));
        id
    }

    /// 下一条语句以存储错误失败
    pub fn fail_next(&self, cause: impl Into<String>) {
        self.lock().fail_next = Some(cause.into());
    }

    /// 插入成功但不返回生成的主键
    pub fn suppress_generated_key(&self) {
        self.lock().suppress_generated_key = true;
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.lock().statements.clone()
    }

    pub fn statement_count(&self) -> usize {
        self.lock().statements.len()
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.lock().tables.get(table).map_or(0, |t| t.rows.len())
    }

    fn begin(&self, statement: &Statement) -> AppResult<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.statements.push(statement.clone());

        if let Some(cause) = state.fail_next.take() {
            return Err(AppError::persistence("Failed to execute statement", cause));
        }
        Ok(state)
    }

    fn select(&self, statement: &Statement) -> AppResult<Vec<MemoryRow>> {
        let mut state = self.begin(statement)?;
        let sql = statement.sql();

        let (head, predicate) = split_where(sql);
        let (columns, table) = head
            .strip_prefix("SELECT ")
            .and_then(|rest| rest.split_once(" FROM "))
            .ok_or_else(|| bad_sql(sql))?;
        let columns: Vec<&str> = columns.split(", ").collect();

        let table = state.tables.entry(table.to_string()).or_default();
        let mut rows = Vec::new();
        for row in &table.rows {
            if matches(row, predicate, statement)? {
                rows.push(row.project(&columns)?);
            }
        }
        Ok(rows)
    }

    fn insert(&self, statement: &Statement) -> AppResult<Option<MemoryRow>> {
        let mut state = self.begin(statement)?;
        let sql = statement.sql();
        let suppress = state.suppress_generated_key;

        let table_name = between(sql, "INSERT INTO ", " (").ok_or_else(|| bad_sql(sql))?;
        let columns = between(sql, " (", ")").ok_or_else(|| bad_sql(sql))?;
        let placeholders = between(sql, "VALUES (", ")").ok_or_else(|| bad_sql(sql))?;
        let key = primary_key(table_name);

        let mut row = HashMap::new();
        for (column, placeholder) in columns.split(", ").zip(placeholders.split(", ")) {
            row.insert(column.to_string(), param(statement, placeholder)?);
        }

        let table = state.tables.entry(table_name.to_string()).or_default();
        table.next_id += 1;
        row.insert(key.to_string(), MemoryValue::Int(table.next_id));
        let row = MemoryRow(row);
        table.rows.push(row.clone());

        if suppress {
            return Ok(None);
        }
        Ok(Some(row.project(&[key])?))
    }

    fn update(&self, statement: &Statement) -> AppResult<u64> {
        let mut state = self.begin(statement)?;
        let sql = statement.sql();

        let (head, predicate) = split_where(sql);
        let (table_name, assignments) = head
            .strip_prefix("UPDATE ")
            .and_then(|rest| rest.split_once(" SET "))
            .ok_or_else(|| bad_sql(sql))?;

        let mut values = Vec::new();
        for assignment in assignments.split(", ") {
            let (column, placeholder) = assignment.split_once(" = ").ok_or_else(|| bad_sql(sql))?;
            values.push((column.to_string(), param(statement, placeholder)?));
        }

        let table = state.tables.entry(table_name.to_string()).or_default();
        let mut affected = 0;
        for row in table.rows.iter_mut() {
            if matches(row, predicate, statement)? {
                for (column, value) in &values {
                    row.0.insert(column.clone(), value.clone());
                }
                affected += 1;
            }
        }
        Ok(affected)
    }

    fn delete(&self, statement: &Statement) -> AppResult<u64> {
        let mut state = self.begin(statement)?;
        let sql = statement.sql();

        let (head, predicate) = split_where(sql);
        let table_name = head.strip_prefix("DELETE FROM ").ok_or_else(|| bad_sql(sql))?;

        let table = state.tables.entry(table_name.to_string()).or_default();
        let before = table.rows.len();
        let mut kept = Vec::with_capacity(before);
        for row in table.rows.drain(..) {
            if !matches(&row, predicate, statement)? {
                kept.push(row);
            }
        }
        table.rows = kept;
        Ok((before - table.rows.len()) as u64)
    }
}

#[async_trait]
impl StatementExecutor for MemoryExecutor {
    type Row = MemoryRow;

    async fn fetch_all(&self, statement: &Statement) -> AppResult<Vec<MemoryRow>> {
        self.select(statement)
    }

    async fn fetch_optional(&self, statement: &Statement) -> AppResult<Option<MemoryRow>> {
        if statement.sql().starts_with("INSERT ") {
            return self.insert(statement);
        }
        Ok(self.select(statement)?.into_iter().next())
    }

    async fn execute(&self, statement: &Statement) -> AppResult<u64> {
        let sql = statement.sql();
        if sql.starts_with("UPDATE ") {
            self.update(statement)
        } else if sql.starts_with("DELETE ") {
            self.delete(statement)
        } else {
            Err(bad_sql(sql))
        }
    }
}

pub fn product(name: &str, category_id: i32, price: Decimal, color: &str) -> Product {
    Product {
        product_id: 0,
        name: name.to_string(),
        price,
        category_id,
        description: format!("{} description", name),
        color: color.to_string(),
        stock: 10,
        is_featured: false,
        image_url: format!("{}.jpg", name.to_lowercase()),
    }
}

pub fn category(name: &str) -> Category {
    Category {
        category_id: 0,
        name: name.to_string(),
        description: format!("{} description", name),
    }
}
