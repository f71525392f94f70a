//! Image Engine Port - 配图生成抽象

use async_trait::async_trait;

use super::{Credential, SynthesisError};
use crate::domain::generation::ResourceHandle;

/// 配图生成请求
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
}

/// Image Engine Port
///
/// 外部文生图服务的抽象接口，产出 16:9 图片
#[async_trait]
pub trait ImageEnginePort: Send + Sync {
    async fn synthesize_image(
        &self,
        request: ImageRequest,
        credential: &Credential,
    ) -> Result<ResourceHandle, SynthesisError>;

    async fn health_check(&self) -> bool {
        true
    }
}
