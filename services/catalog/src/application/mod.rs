//! Application layer

mod handler;
mod queries;

pub use handler::CatalogHandler;
pub use queries::SearchProductsQuery;
