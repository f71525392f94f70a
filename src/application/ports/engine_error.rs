//! Synthesis Error - 外部生成服务错误

use thiserror::Error;

/// 外部生成调用错误
///
/// 编排器对所有变体一视同仁，都视为子任务失败
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    /// 后端返回的错误（鉴权、配额、输入不合法等），消息原样保留
    #[error("{0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Asset storage error: {0}")]
    AssetStorage(String),
}

impl From<super::AssetStoreError> for SynthesisError {
    fn from(err: super::AssetStoreError) -> Self {
        SynthesisError::AssetStorage(err.to_string())
    }
}
