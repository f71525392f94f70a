//! Generation Context - Errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{GenerationStage, ResourceHandle};

/// 后端消息为空时展示的通用提示
pub const GENERIC_FAILURE_MESSAGE: &str = "Generation failed. Please try again.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("API credential is missing")]
    MissingCredential,

    #[error("Narration text is empty")]
    EmptyNarration,

    #[error("Visual prompt is empty")]
    EmptyVisualPrompt,

    #[error("Speaking rate must be between 0.5 and 2.0, got {0}")]
    InvalidSpeakingRate(f32),

    #[error("{stage} failed: {message}")]
    GenerationFailed {
        stage: GenerationStage,
        message: String,
    },

    #[error("A generation run is already in progress")]
    RunInProgress,

    /// `orphaned` 为 run 被取代后才产出、未被任何状态记录的句柄
    #[error("Generation run was reset before it finished")]
    RunSuperseded { orphaned: Vec<ResourceHandle> },

    #[error("Invalid run transition: {0}")]
    InvalidTransition(String),
}

/// 错误类别（供 UI 层区分展示方式）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    /// 需要提示用户输入凭证，而不是显示通用错误
    MissingCredential,
    /// 输入校验失败，行内展示
    InvalidInput,
    /// 外部调用失败
    GenerationFailed,
    /// run 未被执行（已有 run 在进行或被重置）
    Rejected,
}

impl GenerationError {
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            GenerationError::MissingCredential => GenerationErrorKind::MissingCredential,
            GenerationError::EmptyNarration
            | GenerationError::EmptyVisualPrompt
            | GenerationError::InvalidSpeakingRate(_) => GenerationErrorKind::InvalidInput,
            GenerationError::GenerationFailed { .. } => GenerationErrorKind::GenerationFailed,
            GenerationError::RunInProgress
            | GenerationError::RunSuperseded { .. }
            | GenerationError::InvalidTransition(_) => GenerationErrorKind::Rejected,
        }
    }

    /// 面向用户的错误文本
    ///
    /// 外部调用失败时尽量原样透出后端消息
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::GenerationFailed { message, .. } => {
                let message = message.trim();
                if message.is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    message.to_string()
                }
            }
            other => other.to_string(),
        }
    }

    pub fn superseded() -> Self {
        GenerationError::RunSuperseded {
            orphaned: Vec::new(),
        }
    }

    pub fn failed(stage: GenerationStage, message: impl Into<String>) -> Self {
        GenerationError::GenerationFailed {
            stage,
            message: message.into(),
        }
    }
}
