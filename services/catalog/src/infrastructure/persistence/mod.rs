//! Persistence implementations

mod executor;
mod postgres;
pub mod query;
mod row;

pub use executor::{PgExecutor, StatementExecutor};
pub use postgres::{MissingGeneratedKey, PostgresCategoryRepository, PostgresProductRepository};
pub use query::{SqlParam, Statement};
pub use row::{RowAccess, category_from_row, product_from_row};
