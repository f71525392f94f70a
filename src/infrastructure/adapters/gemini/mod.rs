//! Gemini Adapters - 调用 Google Generative Language API
//!
//! - 旁白: POST {base_url}/v1beta/models/{tts_model}:generateContent
//! - 配图: POST {base_url}/v1beta/models/{image_model}:predict
//!
//! 凭证通过 `x-goog-api-key` 头传递。每个请求只尝试一次，不做重试

mod image_client;
mod narration_client;
mod wire;

pub use image_client::GeminiImageClient;
pub use narration_client::GeminiNarrationClient;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use crate::application::ports::{Credential, SynthesisError};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini 客户端配置
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// 语音合成模型
    pub tts_model: String,
    /// 图片生成模型
    pub image_model: String,
    /// 图片宽高比
    pub aspect_ratio: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            image_model: "imagen-3.0-generate-002".to_string(),
            aspect_ratio: "16:9".to_string(),
            timeout_secs: 120,
        }
    }
}

impl GeminiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.base_url.trim_end_matches('/'),
            model,
            method
        )
    }
}

/// 两个客户端共用的 HTTP 调用逻辑
struct GeminiHttp {
    client: Client,
}

impl GeminiHttp {
    fn new(timeout_secs: u64) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SynthesisError::NetworkError(e.to_string()))?;
        Ok(Self { client })
    }

    async fn post_json<B, R>(
        &self,
        url: &str,
        credential: &Credential,
        body: &B,
    ) -> Result<R, SynthesisError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, credential.expose())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout
                } else if e.is_connect() {
                    SynthesisError::NetworkError(format!("Cannot connect to generation service: {}", e))
                } else {
                    SynthesisError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SynthesisError::ServiceError(service_error_message(
                status.as_u16(),
                &error_text,
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    async fn health_check(&self, url: &str) -> bool {
        match self
            .client
            .get(url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => !response.status().is_server_error(),
            Err(_) => false,
        }
    }
}

/// 提取后端错误消息；无法解析时返回 `HTTP {status}: {body}`
fn service_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<wire::ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.trim().is_empty() => envelope.error.message,
        _ => format!("HTTP {}: {}", status, body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = GeminiClientConfig::default();
        assert_eq!(config.aspect_ratio, "16:9");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_model_url() {
        let config = GeminiClientConfig::new("http://example.com/").with_timeout(30);
        assert_eq!(
            config.model_url("imagen-3.0-generate-002", "predict"),
            "http://example.com/v1beta/models/imagen-3.0-generate-002:predict"
        );
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_service_error_message_prefers_backend_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(service_error_message(400, body), "API key not valid.");
        assert_eq!(
            service_error_message(502, "bad gateway"),
            "HTTP 502: bad gateway"
        );
    }
}
