//! 基础设施层

pub mod migrations;
pub mod persistence;
