//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod asset_queries;
mod credential_queries;
mod generation_queries;

pub mod handlers;

pub use asset_queries::*;
pub use credential_queries::*;
pub use generation_queries::*;
