//! Narration Engine Port - 旁白语音合成抽象
//!
//! 具体实现在 infrastructure/adapters 层

use async_trait::async_trait;

use super::{Credential, SynthesisError};
use crate::domain::generation::{NarrationVoice, ResourceHandle, SpeakingRate};

/// 旁白合成请求
#[derive(Debug, Clone)]
pub struct NarrationRequest {
    /// 要朗读的文本
    pub text: String,
    pub voice: NarrationVoice,
    pub rate: SpeakingRate,
}

/// Narration Engine Port
///
/// 外部 TTS 服务的抽象接口。合成结果写入资源存储，只返回句柄
#[async_trait]
pub trait NarrationEnginePort: Send + Sync {
    async fn synthesize_narration(
        &self,
        request: NarrationRequest,
        credential: &Credential,
    ) -> Result<ResourceHandle, SynthesisError>;

    /// 检查服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
