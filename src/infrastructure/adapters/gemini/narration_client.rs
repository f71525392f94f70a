//! Gemini Narration Client - 旁白语音合成

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;

use super::wire::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
};
use super::{GeminiClientConfig, GeminiHttp};
use crate::application::ports::{
    AssetStorePort, Credential, NarrationEnginePort, NarrationRequest, SynthesisError,
};
use crate::domain::generation::{ResourceHandle, SpeakingRate};
use crate::infrastructure::adapters::transcoder::{encode_pcm16_wav, is_raw_pcm, parse_sample_rate};

/// Gemini TTS 客户端
pub struct GeminiNarrationClient {
    http: GeminiHttp,
    config: GeminiClientConfig,
    asset_store: Arc<dyn AssetStorePort>,
}

impl GeminiNarrationClient {
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

    fn infer_url(&self) -> String {
        self.config
            .model_url(&self.config.tts_model, "generateContent")
    }

    fn build_request(request: &NarrationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(narration_prompt(&request.text, request.rate)),
                    inline_data: None,
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: request.voice.as_str().to_string(),
                        },
                    },
                },
            },
        }
    }
}

/// 模型没有语速参数，通过朗读指令表达非默认语速
fn narration_prompt(text: &str, rate: SpeakingRate) -> String {
    if rate.is_normal() {
        text.to_string()
    } else {
        format!(
            "Read the following aloud at {:.2}x the normal speaking pace:\n{}",
            rate.value(),
            text
        )
    }
}

#[async_trait]
impl NarrationEnginePort for GeminiNarrationClient {
    async fn synthesize_narration(
        &self,
        request: NarrationRequest,
        credential: &Credential,
    ) -> Result<ResourceHandle, SynthesisError> {
        let body = Self::build_request(&request);

        tracing::debug!(
            url = %self.infer_url(),
            text_len = request.text.len(),
            voice = %request.voice,
            rate = request.rate.value(),
            "Sending narration request"
        );

        let response: GenerateContentResponse =
            self.http.post_json(&self.infer_url(), credential, &body).await?;

        let inline = response.first_inline_data().ok_or_else(|| {
            SynthesisError::InvalidResponse("Response contains no audio data".to_string())
        })?;
        let raw = general_purpose::STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| SynthesisError::InvalidResponse(format!("Invalid audio encoding: {}", e)))?;

        let (audio, mime_type) = if is_raw_pcm(&inline.mime_type) {
            let sample_rate = parse_sample_rate(&inline.mime_type);
            (encode_pcm16_wav(&raw, sample_rate, 1), "audio/wav".to_string())
        } else {
            (raw, inline.mime_type.clone())
        };

        let audio_size = audio.len();
        let handle = self.asset_store.put(audio, &mime_type)?;

        tracing::info!(
            handle = %handle,
            source_mime = %inline.mime_type,
            audio_size = audio_size,
            "Narration synthesis completed"
        );
        Ok(handle)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/v1beta/models", self.config.base_url.trim_end_matches('/'));
        self.http.health_check(&url).await
    }
}
