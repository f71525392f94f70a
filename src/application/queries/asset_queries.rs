//! Asset Queries - 生成资源查询

use crate::domain::generation::ResourceHandle;

/// 获取资源查询
#[derive(Debug, Clone)]
pub struct GetAssetQuery {
    pub handle: ResourceHandle,
}

/// 获取资源响应
#[derive(Debug, Clone)]
pub struct GetAssetResponse {
    pub data: Vec<u8>,
    pub content_type: String,
    /// 下载文件名使用的扩展名
    pub extension: &'static str,
}
