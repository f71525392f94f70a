//! Generation Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::GenerationError;

/// 生成模式
///
/// 决定一次 run 需要哪些子任务，run 开始后不可变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// 旁白 + 配图
    Both,
    /// 仅旁白
    NarrationOnly,
    /// 仅配图
    ImageOnly,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Both => "both",
            GenerationMode::NarrationOnly => "narration_only",
            GenerationMode::ImageOnly => "image_only",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "both" => Some(GenerationMode::Both),
            "narration_only" => Some(GenerationMode::NarrationOnly),
            "image_only" => Some(GenerationMode::ImageOnly),
            _ => None,
        }
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 子任务
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Job {
    Narration,
    Image,
}

/// 一次 run 需要执行的子任务集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSet {
    pub narration_required: bool,
    pub image_required: bool,
}

impl JobSet {
    /// 由生成模式推导子任务集合（纯函数）
    pub fn for_mode(mode: GenerationMode) -> Self {
        match mode {
            GenerationMode::Both => Self {
                narration_required: true,
                image_required: true,
            },
            GenerationMode::NarrationOnly => Self {
                narration_required: true,
                image_required: false,
            },
            GenerationMode::ImageOnly => Self {
                narration_required: false,
                image_required: true,
            },
        }
    }

    pub fn requires(&self, job: Job) -> bool {
        match job {
            Job::Narration => self.narration_required,
            Job::Image => self.image_required,
        }
    }

    /// 按固定顺序返回需要执行的子任务：旁白总在配图之前
    pub fn ordered(&self) -> Vec<Job> {
        let mut jobs = Vec::with_capacity(2);
        if self.narration_required {
            jobs.push(Job::Narration);
        }
        if self.image_required {
            jobs.push(Job::Image);
        }
        jobs
    }
}

/// 旁白音色（后端预置音色的固定集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NarrationVoice {
    Kore,
    Puck,
    Charon,
    Fenrir,
    Zephyr,
    Aoede,
}

impl NarrationVoice {
    pub const ALL: [NarrationVoice; 6] = [
        NarrationVoice::Kore,
        NarrationVoice::Puck,
        NarrationVoice::Charon,
        NarrationVoice::Fenrir,
        NarrationVoice::Zephyr,
        NarrationVoice::Aoede,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NarrationVoice::Kore => "Kore",
            NarrationVoice::Puck => "Puck",
            NarrationVoice::Charon => "Charon",
            NarrationVoice::Fenrir => "Fenrir",
            NarrationVoice::Zephyr => "Zephyr",
            NarrationVoice::Aoede => "Aoede",
        }
    }

    /// 按名称解析（忽略大小写）
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl Default for NarrationVoice {
    fn default() -> Self {
        NarrationVoice::Kore
    }
}

impl std::fmt::Display for NarrationVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 语速 (0.5 - 2.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct SpeakingRate(f32);

impl SpeakingRate {
    pub const MIN: f32 = 0.5;
    pub const MAX: f32 = 2.0;

    pub fn new(rate: f32) -> Result<Self, GenerationError> {
        if !(Self::MIN..=Self::MAX).contains(&rate) {
            return Err(GenerationError::InvalidSpeakingRate(rate));
        }
        Ok(Self(rate))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn is_normal(&self) -> bool {
        (self.0 - 1.0).abs() < f32::EPSILON
    }
}

impl Default for SpeakingRate {
    fn default() -> Self {
        Self(1.0)
    }
}

impl TryFrom<f32> for SpeakingRate {
    type Error = GenerationError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SpeakingRate> for f32 {
    fn from(rate: SpeakingRate) -> Self {
        rate.0
    }
}

/// 用户输入快照
///
/// run 开始时从 UI 层拷贝，之后只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInputs {
    pub narration_text: String,
    pub visual_prompt: String,
    pub voice: NarrationVoice,
    pub rate: SpeakingRate,
}

impl GenerationInputs {
    pub fn new(
        narration_text: impl Into<String>,
        visual_prompt: impl Into<String>,
        voice: NarrationVoice,
        rate: SpeakingRate,
    ) -> Self {
        Self {
            narration_text: narration_text.into(),
            visual_prompt: visual_prompt.into(),
            voice,
            rate,
        }
    }

    /// 校验子任务所需的输入
    ///
    /// 在任何外部调用之前执行；旁白优先于配图检查
    pub fn validate(&self, jobs: &JobSet) -> Result<(), GenerationError> {
        if jobs.narration_required && self.narration_text.trim().is_empty() {
            return Err(GenerationError::EmptyNarration);
        }
        if jobs.image_required && self.visual_prompt.trim().is_empty() {
            return Err(GenerationError::EmptyVisualPrompt);
        }
        Ok(())
    }
}

/// 资源句柄
///
/// 指向已生成的字节（音频或图片），由表现层解析为 URL；核心层不检查其内容
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceHandle(String);

impl ResourceHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Run 唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 构建子任务集合
pub fn build_job_set(mode: GenerationMode) -> JobSet {
    JobSet::for_mode(mode)
}
