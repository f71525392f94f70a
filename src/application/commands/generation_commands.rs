//! Generation Commands - 生成相关命令

use crate::domain::generation::{GenerationMode, GenerationStage, NarrationVoice, RunId};

/// 开始生成命令
#[derive(Debug, Clone)]
pub struct StartGenerationCommand {
    pub mode: GenerationMode,
    pub narration_text: String,
    pub visual_prompt: String,
    pub voice: NarrationVoice,
    /// 未校验的原始语速
    pub rate: f32,
    /// 为 true 时等待 run 结束再返回，否则在后台执行
    pub wait: bool,
}

/// 开始生成响应
#[derive(Debug, Clone)]
pub struct StartGenerationResponse {
    pub run_id: RunId,
    pub stage: GenerationStage,
}

/// 重置命令
#[derive(Debug, Clone, Default)]
pub struct ResetGenerationCommand;

/// 重置响应
#[derive(Debug, Clone)]
pub struct ResetGenerationResponse {
    pub previous_stage: GenerationStage,
    /// 被释放的资源数量
    pub released_assets: usize,
}
