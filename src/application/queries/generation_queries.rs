//! Generation Queries - 生成状态查询

use chrono::{DateTime, Utc};

use crate::domain::generation::{
    GenerationErrorKind, GenerationMode, GenerationStage, ResourceHandle, RunId,
};

/// 当前 run 状态查询
#[derive(Debug, Clone, Default)]
pub struct GetGenerationStatusQuery;

/// 失败信息（面向用户的文案）
#[derive(Debug, Clone)]
pub struct GenerationFailureInfo {
    pub kind: GenerationErrorKind,
    pub message: String,
    /// 失败前已产生的资源
    pub orphaned_assets: usize,
}

/// 成功产物
#[derive(Debug, Clone)]
pub struct GenerationArtifactInfo {
    pub audio: Option<ResourceHandle>,
    pub image: Option<ResourceHandle>,
    pub narration_text: String,
    pub visual_prompt: String,
    pub created_at: DateTime<Utc>,
}

/// 当前 run 状态响应
#[derive(Debug, Clone)]
pub struct GenerationStatusResponse {
    pub stage: GenerationStage,
    pub is_active: bool,
    pub run_id: Option<RunId>,
    pub mode: Option<GenerationMode>,
    pub progress_message: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub failure: Option<GenerationFailureInfo>,
    pub artifact: Option<GenerationArtifactInfo>,
}
