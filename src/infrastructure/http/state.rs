//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::{
    // Command handlers
    ClearCredentialHandler, ResetGenerationHandler, SetCredentialHandler, StartGenerationHandler,
    // Query handlers
    GetAssetHandler, GetCredentialStatusHandler, GetGenerationStatusHandler,
    // Ports
    AssetStorePort, CredentialStorePort, GenerationOrchestrator,
};
use crate::domain::generation::NarrationVoice;
use crate::domain::playback::PlaybackController;
use crate::infrastructure::events::EventPublisher;

/// 请求未携带音色/语速时使用的默认值
#[derive(Debug, Clone, Copy)]
pub struct GenerationDefaults {
    pub voice: NarrationVoice,
    pub rate: f32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            voice: NarrationVoice::default(),
            rate: 1.0,
        }
    }
}

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub orchestrator: Arc<GenerationOrchestrator>,
    pub asset_store: Arc<dyn AssetStorePort>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Presentation ==========
    pub defaults: GenerationDefaults,
    /// 资源 URL 前缀
    pub public_base_url: String,
    /// 当前旁白的播放控制；重置或切换资源时重建
    pub playback: Mutex<Option<PlaybackController>>,

    // ========== Command Handlers ==========
    pub start_generation_handler: StartGenerationHandler,
    pub reset_generation_handler: ResetGenerationHandler,
    pub set_credential_handler: SetCredentialHandler,
    pub clear_credential_handler: ClearCredentialHandler,

    // ========== Query Handlers ==========
    pub get_generation_status_handler: GetGenerationStatusHandler,
    pub get_credential_status_handler: GetCredentialStatusHandler,
    pub get_asset_handler: GetAssetHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        orchestrator: Arc<GenerationOrchestrator>,
        credential_store: Arc<dyn CredentialStorePort>,
        asset_store: Arc<dyn AssetStorePort>,
        event_publisher: Arc<EventPublisher>,
        defaults: GenerationDefaults,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator: orchestrator.clone(),
            asset_store: asset_store.clone(),
            event_publisher,

            defaults,
            public_base_url: public_base_url.into(),
            playback: Mutex::new(None),

            // Command handlers
            start_generation_handler: StartGenerationHandler::new(
                orchestrator.clone(),
                asset_store.clone(),
            ),
            reset_generation_handler: ResetGenerationHandler::new(
                orchestrator.clone(),
                asset_store.clone(),
            ),
            set_credential_handler: SetCredentialHandler::new(
                credential_store.clone(),
                orchestrator.clone(),
            ),
            clear_credential_handler: ClearCredentialHandler::new(
                credential_store,
                orchestrator.clone(),
            ),

            // Query handlers
            get_generation_status_handler: GetGenerationStatusHandler::new(orchestrator.clone()),
            get_credential_status_handler: GetCredentialStatusHandler::new(orchestrator),
            get_asset_handler: GetAssetHandler::new(asset_store),
        }
    }
}
