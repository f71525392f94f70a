//! Asset Handlers - 生成资源下载

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::GetAssetQuery;
use crate::domain::generation::ResourceHandle;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AssetParams {
    /// 以附件形式下载
    #[serde(default)]
    pub download: bool,
}

pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(handle): Path<String>,
    Query(params): Query<AssetParams>,
) -> Result<Response, ApiError> {
    let query = GetAssetQuery {
        handle: ResourceHandle::new(handle.clone()),
    };
    let result = state.get_asset_handler.handle(query)?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type)
        .header(header::CONTENT_LENGTH, result.data.len());

    if params.download {
        builder = builder.header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.{}\"", handle, result.extension),
        );
    }

    builder
        .body(Body::from(result.data))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
