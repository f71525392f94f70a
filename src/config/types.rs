//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::generation::{GenerationError, NarrationVoice, SpeakingRate};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 生成后端配置
    #[serde(default)]
    pub backend: BackendConfig,

    /// 凭证存储配置
    #[serde(default)]
    pub credential: CredentialConfig,

    /// 生成参数默认值
    #[serde(default)]
    pub generation: GenerationConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL（用于拼接资源地址）
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// 生成后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Google Generative Language API
    #[default]
    Gemini,
    /// 进程内假后端（本地开发/演示）
    Fake,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Gemini => "gemini",
            BackendKind::Fake => "fake",
        }
    }
}

/// 生成后端配置
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,

    /// API 基础 URL
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// 语音合成模型
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// 图片生成模型
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,

    /// 图片宽高比
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
}

fn default_backend_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_image_model() -> String {
    "imagen-3.0-generate-002".to_string()
}

fn default_backend_timeout() -> u64 {
    120
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            base_url: default_backend_url(),
            tts_model: default_tts_model(),
            image_model: default_image_model(),
            timeout_secs: default_backend_timeout(),
            aspect_ratio: default_aspect_ratio(),
        }
    }
}

/// 凭证存储配置
#[derive(Clone, Deserialize)]
pub struct CredentialConfig {
    /// Sled 数据库路径
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// 启动时写入空存储的 API Key
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/credential.sled")
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            api_key: None,
        }
    }
}

impl std::fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("store_path", &self.store_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// 生成参数默认值（请求未携带时使用）
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// 默认音色
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// 默认语速
    #[serde(default = "default_rate")]
    pub default_rate: f32,
}

fn default_voice() -> String {
    NarrationVoice::default().as_str().to_string()
}

fn default_rate() -> f32 {
    1.0
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_voice: default_voice(),
            default_rate: default_rate(),
        }
    }
}

impl GenerationConfig {
    pub fn voice(&self) -> Option<NarrationVoice> {
        NarrationVoice::from_name(&self.default_voice)
    }

    pub fn rate(&self) -> Result<SpeakingRate, GenerationError> {
        SpeakingRate::new(self.default_rate)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5070);
        assert_eq!(config.backend.kind, BackendKind::Gemini);
        assert_eq!(config.backend.tts_model, "gemini-2.5-flash-preview-tts");
        assert_eq!(
            config.credential.store_path,
            PathBuf::from("data/credential.sled")
        );
        assert_eq!(config.generation.voice(), Some(NarrationVoice::Kore));
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5070");
        assert_eq!(config.public_base_url(), "http://localhost:5070");
    }

    #[test]
    fn test_credential_debug_hides_key() {
        let config = CredentialConfig {
            api_key: Some("secret-key".to_string()),
            ..Default::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret-key"));
    }
}
