//! Credential Handlers
//!
//! 凭证内容只写不读，查询接口只返回是否存在

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ClearCredentialCommand, GetCredentialStatusQuery, SetCredentialCommand};
use crate::infrastructure::http::dto::{
    ApiResponse, CredentialStatusDto, Empty, SetCredentialRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn credential_status(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<CredentialStatusDto>> {
    let result = state
        .get_credential_status_handler
        .handle(GetCredentialStatusQuery);
    Json(ApiResponse::success(result.into()))
}

pub async fn set_credential(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetCredentialRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .set_credential_handler
        .handle(SetCredentialCommand {
            api_key: req.api_key,
        })
        .await?;
    Ok(Json(ApiResponse::ok()))
}

pub async fn clear_credential(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .clear_credential_handler
        .handle(ClearCredentialCommand)
        .await?;
    Ok(Json(ApiResponse::ok()))
}
