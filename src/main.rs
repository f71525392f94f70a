//! factreel - 旁白事实短片生成服务
//!
//! - Domain: generation/, playback/
//! - Application: orchestrator, credential gate, commands, queries, ports
//! - Infrastructure: http, adapters, memory, persistence, events

use std::sync::Arc;

use factreel::application::{
    Credential, CredentialGate, CredentialStorePort, GenerationOrchestrator, ImageEnginePort,
    NarrationEnginePort,
};
use factreel::config::{load_config, print_config, AppConfig, BackendKind};
use factreel::infrastructure::adapters::{
    FakeImageClient, FakeNarrationClient, GeminiClientConfig, GeminiImageClient,
    GeminiNarrationClient,
};
use factreel::infrastructure::events::EventPublisher;
use factreel::infrastructure::http::{AppState, GenerationDefaults, HttpServer};
use factreel::infrastructure::memory::InMemoryAssetStore;
use factreel::infrastructure::persistence::{SledCredentialStore, SledCredentialStoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("factreel - narrated fact video generator");
    print_config(&config);

    // 凭证存储（跨重启保留）
    if let Some(parent) = config.credential.store_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let credential_store = Arc::new(SledCredentialStore::new(&SledCredentialStoreConfig {
        db_path: config.credential.store_path.display().to_string(),
    })?);
    seed_credential(&config, credential_store.as_ref())?;

    // 生成资源只在进程内有效
    let asset_store = Arc::new(InMemoryAssetStore::new());

    let narration_engine: Arc<dyn NarrationEnginePort>;
    let image_engine: Arc<dyn ImageEnginePort>;
    match config.backend.kind {
        BackendKind::Gemini => {
            let client_config = GeminiClientConfig {
                base_url: config.backend.base_url.clone(),
                tts_model: config.backend.tts_model.clone(),
                image_model: config.backend.image_model.clone(),
                aspect_ratio: config.backend.aspect_ratio.clone(),
                timeout_secs: config.backend.timeout_secs,
            };
            narration_engine = Arc::new(GeminiNarrationClient::new(
                client_config.clone(),
                asset_store.clone(),
            )?);
            image_engine = Arc::new(GeminiImageClient::new(client_config, asset_store.clone())?);
        }
        BackendKind::Fake => {
            tracing::warn!("Using fake generation backend");
            narration_engine = Arc::new(FakeNarrationClient::new(asset_store.clone()));
            image_engine = Arc::new(FakeImageClient::new(asset_store.clone()));
        }
    }

    if !narration_engine.health_check().await || !image_engine.health_check().await {
        tracing::warn!("Generation backend health check failed; requests may fail");
    }

    let event_publisher = Arc::new(EventPublisher::new());

    let orchestrator = GenerationOrchestrator::new(
        CredentialGate::new(credential_store.clone()),
        narration_engine,
        image_engine,
        event_publisher.clone(),
    )
    .arc();

    // 配置已校验过音色和语速
    let defaults = GenerationDefaults {
        voice: config.generation.voice().unwrap_or_default(),
        rate: config.generation.default_rate,
    };

    let state = AppState::new(
        orchestrator,
        credential_store,
        asset_store,
        event_publisher,
        defaults,
        config.server.public_base_url(),
    );

    let server = HttpServer::new(&config.server, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},factreel={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 存储为空时写入配置中的 API Key，不覆盖用户已保存的凭证
fn seed_credential(config: &AppConfig, store: &dyn CredentialStorePort) -> anyhow::Result<()> {
    let Some(api_key) = config.credential.api_key.as_deref() else {
        return Ok(());
    };
    if store.get()?.is_some() {
        tracing::debug!("Credential store already populated; seed ignored");
        return Ok(());
    }
    store.set(Credential::new(api_key)?)?;
    tracing::info!("API credential seeded from configuration");
    Ok(())
}
