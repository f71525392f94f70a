//! Memory Layer - In-Memory State Management
//!
//! 实现资源存储和凭证存储的内存版本；资源只在当前进程内有效

mod asset_store;
mod credential_store;

pub use asset_store::InMemoryAssetStore;
pub use credential_store::InMemoryCredentialStore;
