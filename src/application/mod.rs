//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（NarrationEngine、ImageEngine、CredentialStore、AssetStore）
//! - credential_gate: 生成前的凭证检查
//! - orchestrator: 单飞生成编排器
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod credential_gate;
pub mod error;
pub mod orchestrator;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Credential commands
    ClearCredentialCommand,
    SetCredentialCommand,
    // Generation commands
    ResetGenerationCommand,
    ResetGenerationResponse,
    StartGenerationCommand,
    StartGenerationResponse,
    // Handlers
    handlers::{
        ClearCredentialHandler, ResetGenerationHandler, SetCredentialHandler,
        StartGenerationHandler,
    },
};

pub use credential_gate::CredentialGate;
pub use error::ApplicationError;
pub use orchestrator::GenerationOrchestrator;

pub use ports::{
    AssetStoreError, AssetStorePort, Credential, CredentialStoreError, CredentialStorePort,
    ImageEnginePort, ImageRequest, NarrationEnginePort, NarrationRequest, StoredAsset,
    SynthesisError,
};

pub use queries::{
    CredentialStatusResponse, GenerationArtifactInfo, GenerationFailureInfo,
    GenerationStatusResponse, GetAssetQuery, GetAssetResponse, GetCredentialStatusQuery,
    GetGenerationStatusQuery,
    handlers::{GetAssetHandler, GetCredentialStatusHandler, GetGenerationStatusHandler},
};
