//! bootstrap - 统一服务启动骨架
//!
//! 所有服务复用的启动逻辑

mod infrastructure;
mod ops;
mod retry;
mod runtime;
mod starter;

pub use infrastructure::*;
pub use ops::*;
pub use retry::*;
pub use runtime::*;
pub use starter::*;
