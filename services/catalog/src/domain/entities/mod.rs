//! 领域实体

mod category;
mod filter;
mod product;

pub use category::Category;
pub use filter::FilterSpec;
pub use product::Product;
