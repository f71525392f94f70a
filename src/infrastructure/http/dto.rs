//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::{
    CredentialStatusResponse, GenerationArtifactInfo, GenerationStatusResponse,
    ResetGenerationResponse, StartGenerationResponse,
};
use crate::domain::generation::{GenerationErrorKind, GenerationMode, GenerationStage};
use crate::domain::playback::{PlaybackAction, PlaybackState};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

// ============================================================================
// Generation DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartGenerationRequest {
    pub mode: GenerationMode,
    #[serde(default)]
    pub narration_text: String,
    #[serde(default)]
    pub visual_prompt: String,
    /// 音色名，缺省使用配置中的默认音色
    #[serde(default)]
    pub voice: Option<String>,
    /// 语速，缺省使用配置中的默认语速
    #[serde(default)]
    pub rate: Option<f32>,
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Serialize)]
pub struct StartGenerationDto {
    pub run_id: String,
    pub stage: GenerationStage,
}

impl From<StartGenerationResponse> for StartGenerationDto {
    fn from(resp: StartGenerationResponse) -> Self {
        Self {
            run_id: resp.run_id.to_string(),
            stage: resp.stage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResetGenerationDto {
    pub previous_stage: GenerationStage,
    pub released_assets: usize,
}

impl From<ResetGenerationResponse> for ResetGenerationDto {
    fn from(resp: ResetGenerationResponse) -> Self {
        Self {
            previous_stage: resp.previous_stage,
            released_assets: resp.released_assets,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerationFailureDto {
    pub kind: GenerationErrorKind,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationArtifactDto {
    pub audio_handle: Option<String>,
    pub audio_url: Option<String>,
    pub image_handle: Option<String>,
    pub image_url: Option<String>,
    pub narration_text: String,
    pub visual_prompt: String,
    pub created_at: String,
}

impl GenerationArtifactDto {
    pub fn from_info(info: GenerationArtifactInfo, base_url: &str) -> Self {
        let url = |handle: &str| asset_url(base_url, handle);
        Self {
            audio_url: info.audio.as_ref().map(|h| url(h.as_str())),
            audio_handle: info.audio.map(|h| h.as_str().to_string()),
            image_url: info.image.as_ref().map(|h| url(h.as_str())),
            image_handle: info.image.map(|h| h.as_str().to_string()),
            narration_text: info.narration_text,
            visual_prompt: info.visual_prompt,
            created_at: info.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerationStatusDto {
    pub stage: GenerationStage,
    pub is_active: bool,
    pub run_id: Option<String>,
    pub mode: Option<GenerationMode>,
    pub progress_message: Option<String>,
    pub started_at: Option<String>,
    pub error: Option<GenerationFailureDto>,
    pub artifact: Option<GenerationArtifactDto>,
}

impl GenerationStatusDto {
    pub fn from_response(resp: GenerationStatusResponse, base_url: &str) -> Self {
        Self {
            stage: resp.stage,
            is_active: resp.is_active,
            run_id: resp.run_id.map(|id| id.to_string()),
            mode: resp.mode,
            progress_message: resp.progress_message,
            started_at: resp.started_at.map(|t| t.to_rfc3339()),
            error: resp.failure.map(|f| GenerationFailureDto {
                kind: f.kind,
                message: f.message,
            }),
            artifact: resp
                .artifact
                .map(|a| GenerationArtifactDto::from_info(a, base_url)),
        }
    }
}

/// 可选参数（音色、语速范围、默认值）
#[derive(Debug, Serialize)]
pub struct GenerationOptionsDto {
    pub modes: Vec<GenerationMode>,
    pub voices: Vec<&'static str>,
    pub default_voice: &'static str,
    pub default_rate: f32,
    pub min_rate: f32,
    pub max_rate: f32,
}

/// 资源访问地址
pub fn asset_url(base_url: &str, handle: &str) -> String {
    format!("{}/api/assets/{}", base_url.trim_end_matches('/'), handle)
}

// ============================================================================
// Credential DTOs
// ============================================================================

#[derive(Deserialize)]
pub struct SetCredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct CredentialStatusDto {
    pub has_credential: bool,
}

impl From<CredentialStatusResponse> for CredentialStatusDto {
    fn from(resp: CredentialStatusResponse) -> Self {
        Self {
            has_credential: resp.has_credential,
        }
    }
}

// ============================================================================
// Playback DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PlaybackRequest {
    pub handle: String,
}

#[derive(Debug, Serialize)]
pub struct PlaybackDto {
    pub handle: String,
    pub state: PlaybackState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<PlaybackAction>,
}
