//! Generation Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    GetGenerationStatusQuery, ResetGenerationCommand, StartGenerationCommand,
};
use crate::domain::generation::{GenerationMode, NarrationVoice, SpeakingRate};
use crate::infrastructure::http::dto::{
    ApiResponse, GenerationOptionsDto, GenerationStatusDto, ResetGenerationDto,
    StartGenerationDto, StartGenerationRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// Start
// ============================================================================

pub async fn start_generation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartGenerationRequest>,
) -> Result<Json<ApiResponse<StartGenerationDto>>, ApiError> {
    let voice = match req.voice.as_deref() {
        Some(name) => NarrationVoice::from_name(name)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown voice: {}", name)))?,
        None => state.defaults.voice,
    };

    let cmd = StartGenerationCommand {
        mode: req.mode,
        narration_text: req.narration_text,
        visual_prompt: req.visual_prompt,
        voice,
        rate: req.rate.unwrap_or(state.defaults.rate),
        wait: req.wait,
    };

    let result = state.start_generation_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(result.into())))
}

// ============================================================================
// Reset
// ============================================================================

pub async fn reset_generation(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<ResetGenerationDto>> {
    let result = state
        .reset_generation_handler
        .handle(ResetGenerationCommand)
        .await;

    // 旧资源已释放，播放控制随之失效
    state.playback.lock().await.take();

    Json(ApiResponse::success(result.into()))
}

// ============================================================================
// Status
// ============================================================================

pub async fn generation_status(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<GenerationStatusDto>> {
    let result = state
        .get_generation_status_handler
        .handle(GetGenerationStatusQuery)
        .await;

    Json(ApiResponse::success(GenerationStatusDto::from_response(
        result,
        &state.public_base_url,
    )))
}

// ============================================================================
// Options
// ============================================================================

pub async fn generation_options(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<GenerationOptionsDto>> {
    Json(ApiResponse::success(GenerationOptionsDto {
        modes: vec![
            GenerationMode::Both,
            GenerationMode::NarrationOnly,
            GenerationMode::ImageOnly,
        ],
        voices: NarrationVoice::ALL.iter().map(|v| v.as_str()).collect(),
        default_voice: state.defaults.voice.as_str(),
        default_rate: state.defaults.rate,
        min_rate: SpeakingRate::MIN,
        max_rate: SpeakingRate::MAX,
    }))
}
