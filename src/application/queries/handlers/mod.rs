//! Query Handlers 实现

mod asset_handlers;
mod credential_handlers;
mod generation_handlers;

pub use asset_handlers::*;
pub use credential_handlers::*;
pub use generation_handlers::*;
