//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Generation Context: 生成编排（模式、输入校验、Run 状态机）
//! - Playback Context: 旁白播放控制

pub mod generation;
pub mod playback;
