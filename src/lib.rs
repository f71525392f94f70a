//! factreel - 旁白事实短片生成服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Generation Context: 生成模式、输入校验、Run 状态机
//! - Playback Context: 旁白播放控制
//!
//! 应用层 (application/):
//! - Ports: 端口定义（NarrationEngine, ImageEngine, CredentialStore, AssetStore）
//! - Orchestrator: 单飞顺序生成编排
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Adapters: Gemini / Fake 生成客户端, PCM → WAV 封装
//! - Memory: 资源存储、凭证存储内存实现
//! - Persistence: Sled 凭证存储
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
