//! Asset Store Port - 生成资源存储
//!
//! 资源只在当前进程生命周期内有效

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::generation::ResourceHandle;

#[derive(Debug, Error)]
pub enum AssetStoreError {
    #[error("Asset is empty")]
    EmptyAsset,
}

/// 已存储的资源
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

impl StoredAsset {
    /// 由 MIME 类型推断文件扩展名（下载时使用）
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "audio/wav" | "audio/x-wav" => "wav",
            "audio/mpeg" => "mp3",
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

/// Asset Store Port
pub trait AssetStorePort: Send + Sync {
    fn put(&self, data: Vec<u8>, mime_type: &str) -> Result<ResourceHandle, AssetStoreError>;

    fn get(&self, handle: &ResourceHandle) -> Option<StoredAsset>;

    /// 删除资源，返回是否存在
    fn remove(&self, handle: &ResourceHandle) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
