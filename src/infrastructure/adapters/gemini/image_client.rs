//! Gemini Image Client - 16:9 配图生成（Imagen）

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;

use super::wire::{PredictInstance, PredictParameters, PredictRequest, PredictResponse};
use super::{GeminiClientConfig, GeminiHttp};
use crate::application::ports::{
    AssetStorePort, Credential, ImageEnginePort, ImageRequest, SynthesisError,
};
use crate::domain::generation::ResourceHandle;

/// Imagen 客户端
pub struct GeminiImageClient {
    http: GeminiHttp,
    config: GeminiClientConfig,
    asset_store: Arc<dyn AssetStorePort>,
}

impl GeminiImageClient {
    pub fn new(
        config: GeminiClientConfig,
        asset_store: Arc<dyn AssetStorePort>,
    ) -> Result<Self, SynthesisError> {
        let http = GeminiHttp::new(config.timeout_secs)?;
        Ok(Self {
            http,
            config,
            asset_store,
        })
    }

    fn predict_url(&self) -> String {
        self.config.model_url(&self.config.image_model, "predict")
    }

    fn build_request(&self, request: &ImageRequest) -> PredictRequest {
        PredictRequest {
            instances: vec![PredictInstance {
                prompt: request.prompt.clone(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: self.config.aspect_ratio.clone(),
            },
        }
    }
}

#[async_trait]
impl ImageEnginePort for GeminiImageClient {
    async fn synthesize_image(
        &self,
        request: ImageRequest,
        credential: &Credential,
    ) -> Result<ResourceHandle, SynthesisError> {
        let body = self.build_request(&request);

        tracing::debug!(
            url = %self.predict_url(),
            prompt_len = request.prompt.len(),
            aspect_ratio = %self.config.aspect_ratio,
            "Sending image request"
        );

        let response: PredictResponse =
            self.http.post_json(&self.predict_url(), credential, &body).await?;

        let prediction = response.predictions.into_iter().next().ok_or_else(|| {
            // 安全过滤命中时后端返回空 predictions
            SynthesisError::ServiceError(
                "No image was generated. The prompt may have been blocked.".to_string(),
            )
        })?;
        let encoded = prediction.bytes_base64_encoded.ok_or_else(|| {
            SynthesisError::InvalidResponse("Prediction contains no image bytes".to_string())
        })?;
        let image = general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| SynthesisError::InvalidResponse(format!("Invalid image encoding: {}", e)))?;

        let mime_type = prediction.mime_type.unwrap_or_else(|| "image/png".to_string());
        let image_size = image.len();
        let handle = self.asset_store.put(image, &mime_type)?;

        tracing::info!(
            handle = %handle,
            mime_type = %mime_type,
            image_size = image_size,
            "Image synthesis completed"
        );
        Ok(handle)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/v1beta/models", self.config.base_url.trim_end_matches('/'));
        self.http.health_check(&url).await
    }
}
