//! Asset Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::AssetStorePort;
use crate::application::queries::asset_queries::{GetAssetQuery, GetAssetResponse};

/// GetAsset Handler - 按句柄读取生成资源
pub struct GetAssetHandler {
    asset_store: Arc<dyn AssetStorePort>,
}

impl GetAssetHandler {
    pub fn new(asset_store: Arc<dyn AssetStorePort>) -> Self {
        Self { asset_store }
    }

    pub fn handle(&self, query: GetAssetQuery) -> Result<GetAssetResponse, ApplicationError> {
        let asset = self
            .asset_store
            .get(&query.handle)
            .ok_or_else(|| ApplicationError::not_found("Asset", query.handle.as_str()))?;

        let extension = asset.extension();
        Ok(GetAssetResponse {
            data: asset.data,
            content_type: asset.mime_type,
            extension,
        })
    }
}
