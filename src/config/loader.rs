//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, BackendKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `FACTREEL_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `FACTREEL_SERVER__PORT=8080`
/// - `FACTREEL_BACKEND__KIND=fake`
/// - `FACTREEL_CREDENTIAL__API_KEY=...`
/// - `FACTREEL_GENERATION__DEFAULT_VOICE=Puck`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5070)?
        .set_default("backend.kind", "gemini")?
        .set_default("backend.base_url", "https://generativelanguage.googleapis.com")?
        .set_default("backend.tts_model", "gemini-2.5-flash-preview-tts")?
        .set_default("backend.image_model", "imagen-3.0-generate-002")?
        .set_default("backend.timeout_secs", 120)?
        .set_default("backend.aspect_ratio", "16:9")?
        .set_default("credential.store_path", "data/credential.sled")?
        .set_default("generation.default_voice", "Kore")?
        .set_default("generation.default_rate", 1.0)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: FACTREEL_BACKEND__TIMEOUT_SECS=60
    builder = builder.add_source(
        Environment::with_prefix("FACTREEL")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.backend.kind == BackendKind::Gemini && config.backend.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Backend base URL cannot be empty".to_string(),
        ));
    }

    if config.backend.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Backend timeout cannot be 0".to_string(),
        ));
    }

    if config.generation.voice().is_none() {
        return Err(ConfigError::ValidationError(format!(
            "Unknown default voice: {}",
            config.generation.default_voice
        )));
    }

    if let Err(e) = config.generation.rate() {
        return Err(ConfigError::ValidationError(e.to_string()));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("Backend: {}", config.backend.kind.as_str());
    if config.backend.kind == BackendKind::Gemini {
        tracing::info!("Backend URL: {}", config.backend.base_url);
        tracing::info!("TTS Model: {}", config.backend.tts_model);
        tracing::info!("Image Model: {}", config.backend.image_model);
        tracing::info!("Backend Timeout: {}s", config.backend.timeout_secs);
    }
    tracing::info!("Credential Store: {:?}", config.credential.store_path);
    tracing::info!(
        "Credential Seed: {}",
        if config.credential.api_key.is_some() {
            "configured"
        } else {
            "none"
        }
    );
    tracing::info!(
        "Default Voice: {} @ {}x",
        config.generation.default_voice,
        config.generation.default_rate
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
