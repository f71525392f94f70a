//! Persistence Layer - 数据持久化
//!
//! Sled 存储实现（凭证跨进程重启保留）

pub mod sled;

pub use self::sled::{SledCredentialStore, SledCredentialStoreConfig};
