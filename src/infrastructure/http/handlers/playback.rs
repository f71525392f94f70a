//! Playback Handlers
//!
//! 播放控件的 toggle / ended 通知，返回界面需要执行的动作。
//! 只有最近一次成功 run 的旁白音频可以播放。

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::generation::ResourceHandle;
use crate::domain::playback::PlaybackController;
use crate::infrastructure::http::dto::{ApiResponse, PlaybackDto, PlaybackRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn toggle_playback(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaybackRequest>,
) -> Result<Json<ApiResponse<PlaybackDto>>, ApiError> {
    let handle = ResourceHandle::new(req.handle);
    ensure_current_narration(&state, &handle).await?;

    let mut playback = state.playback.lock().await;
    if playback.as_ref().is_some_and(|ctl| ctl.handle() != &handle) {
        *playback = None;
    }
    let controller = playback.get_or_insert_with(|| PlaybackController::new(handle.clone()));
    let action = controller.toggle();

    Ok(Json(ApiResponse::success(PlaybackDto {
        handle: handle.as_str().to_string(),
        state: controller.state(),
        action: Some(action),
    })))
}

pub async fn playback_ended(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaybackRequest>,
) -> Result<Json<ApiResponse<PlaybackDto>>, ApiError> {
    let handle = ResourceHandle::new(req.handle);
    ensure_current_narration(&state, &handle).await?;

    let mut playback = state.playback.lock().await;
    let controller = playback
        .as_mut()
        .filter(|ctl| ctl.handle() == &handle)
        .ok_or_else(|| ApiError::NotFound(format!("No playback for asset: {}", handle)))?;

    controller.on_ended();

    Ok(Json(ApiResponse::success(PlaybackDto {
        handle: handle.as_str().to_string(),
        state: controller.state(),
        action: None,
    })))
}

async fn ensure_current_narration(state: &AppState, handle: &ResourceHandle) -> Result<(), ApiError> {
    let run = state.orchestrator.snapshot().await;
    let narration = run.artifact().and_then(|artifact| artifact.audio.as_ref());
    if narration != Some(handle) || state.asset_store.get(handle).is_none() {
        tracing::debug!(handle = %handle, "Playback rejected: not the current narration");
        return Err(ApiError::NotFound(format!("No playable narration: {}", handle)));
    }
    Ok(())
}
