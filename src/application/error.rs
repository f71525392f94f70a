//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::CredentialStoreError;
use crate::domain::generation::GenerationError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 缺少 API 凭证（需提示用户输入）
    #[error("API credential is missing")]
    CredentialRequired,

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

impl From<GenerationError> for ApplicationError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingCredential => Self::CredentialRequired,
            GenerationError::EmptyNarration
            | GenerationError::EmptyVisualPrompt
            | GenerationError::InvalidSpeakingRate(_) => Self::ValidationError(err.to_string()),
            GenerationError::GenerationFailed { .. } => {
                Self::ExternalServiceError(err.user_message())
            }
            GenerationError::RunInProgress | GenerationError::RunSuperseded { .. } => {
                Self::InvalidState(err.to_string())
            }
            GenerationError::InvalidTransition(_) => Self::InternalError(err.to_string()),
        }
    }
}

impl From<CredentialStoreError> for ApplicationError {
    fn from(err: CredentialStoreError) -> Self {
        match err {
            CredentialStoreError::Empty => Self::ValidationError(err.to_string()),
            _ => Self::StorageError(err.to_string()),
        }
    }
}
