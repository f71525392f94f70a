//! In-Memory Asset Store Implementation

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{AssetStoreError, AssetStorePort, StoredAsset};
use crate::domain::generation::ResourceHandle;

/// 内存资源存储
pub struct InMemoryAssetStore {
    /// handle -> asset
    assets: DashMap<String, StoredAsset>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self {
            assets: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 当前占用的字节数
    pub fn total_bytes(&self) -> u64 {
        self.assets.iter().map(|e| e.data.len() as u64).sum()
    }
}

impl Default for InMemoryAssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetStorePort for InMemoryAssetStore {
    fn put(&self, data: Vec<u8>, mime_type: &str) -> Result<ResourceHandle, AssetStoreError> {
        if data.is_empty() {
            return Err(AssetStoreError::EmptyAsset);
        }

        let handle = ResourceHandle::new(Uuid::new_v4().to_string());
        let size = data.len();
        self.assets.insert(
            handle.as_str().to_string(),
            StoredAsset {
                data,
                mime_type: mime_type.to_string(),
                created_at: Utc::now(),
            },
        );
        tracing::debug!(handle = %handle, mime_type = %mime_type, size = size, "Asset stored");
        Ok(handle)
    }

    fn get(&self, handle: &ResourceHandle) -> Option<StoredAsset> {
        self.assets.get(handle.as_str()).map(|a| a.clone())
    }

    fn remove(&self, handle: &ResourceHandle) -> bool {
        let removed = self.assets.remove(handle.as_str()).is_some();
        if removed {
            tracing::debug!(handle = %handle, "Asset released");
        }
        removed
    }

    fn len(&self) -> usize {
        self.assets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_lifecycle() {
        let store = InMemoryAssetStore::new();
        let handle = store.put(vec![1, 2, 3], "audio/wav").unwrap();

        let asset = store.get(&handle).unwrap();
        assert_eq!(asset.data, vec![1, 2, 3]);
        assert_eq!(asset.extension(), "wav");
        assert_eq!(store.total_bytes(), 3);

        assert!(store.remove(&handle));
        assert!(!store.remove(&handle));
        assert!(store.get(&handle).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_asset_rejected() {
        let store = InMemoryAssetStore::new();
        assert!(matches!(
            store.put(Vec::new(), "image/png"),
            Err(AssetStoreError::EmptyAsset)
        ));
    }
}
