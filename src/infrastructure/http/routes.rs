//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                    GET   健康检查
//! - /api/credential              GET   凭证是否存在
//! - /api/credential/set          POST  设置凭证
//! - /api/credential/clear        POST  清除凭证
//! - /api/generation/start        POST  开始生成
//! - /api/generation/reset        POST  重置并释放资源
//! - /api/generation/status       GET   当前 run 快照
//! - /api/generation/options      GET   可选音色、语速范围
//! - /api/assets/:handle          GET   获取资源（?download=true 作为附件）
//! - /api/playback/toggle         POST  播放/暂停
//! - /api/playback/ended          POST  播放结束通知
//! - /ws/generation               WS    生成进度事件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/generation", get(handlers::generation_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/credential", credential_routes())
        .nest("/generation", generation_routes())
        .nest("/playback", playback_routes())
        .route("/assets/:handle", get(handlers::get_asset))
}

/// Credential 路由
fn credential_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::credential_status))
        .route("/set", post(handlers::set_credential))
        .route("/clear", post(handlers::clear_credential))
}

/// Generation 路由
fn generation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/start", post(handlers::start_generation))
        .route("/reset", post(handlers::reset_generation))
        .route("/status", get(handlers::generation_status))
        .route("/options", get(handlers::generation_options))
}

/// Playback 路由
fn playback_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/toggle", post(handlers::toggle_playback))
        .route("/ended", post(handlers::playback_ended))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::application::{
        CredentialGate, CredentialStorePort, GenerationOrchestrator,
    };
    use crate::infrastructure::adapters::{FakeImageClient, FakeNarrationClient};
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::http::state::GenerationDefaults;
    use crate::infrastructure::memory::{InMemoryAssetStore, InMemoryCredentialStore};

    struct TestApp {
        router: Router,
        images: Arc<FakeImageClient>,
    }

    fn test_app() -> TestApp {
        let credentials = Arc::new(InMemoryCredentialStore::new());
        let assets = Arc::new(InMemoryAssetStore::new());
        let images = Arc::new(FakeImageClient::new(assets.clone()));
        let events = Arc::new(EventPublisher::new());
        let orchestrator = GenerationOrchestrator::new(
            CredentialGate::new(credentials.clone()),
            Arc::new(FakeNarrationClient::new(assets.clone())),
            images.clone(),
            events.clone(),
        )
        .arc();
        let state = AppState::new(
            orchestrator,
            credentials as Arc<dyn CredentialStorePort>,
            assets,
            events,
            GenerationDefaults::default(),
            "http://localhost:5070",
        );
        TestApp {
            router: create_routes().with_state(Arc::new(state)),
            images,
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn start_body(wait: bool) -> Value {
        json!({
            "mode": "both",
            "narration_text": "A group of flamingos is called a flamboyance.",
            "visual_prompt": "flamingos at sunset, cinematic",
            "voice": "puck",
            "rate": 1.25,
            "wait": wait,
        })
    }

    #[tokio::test]
    async fn test_ping() {
        let app = test_app();
        let (status, body) = send(&app.router, get_req("/api/ping")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["busy"], false);
    }

    #[tokio::test]
    async fn test_start_without_credential_prompts_for_key() {
        let app = test_app();
        let (_, body) = send(&app.router, post_json("/api/generation/start", start_body(true))).await;
        assert_eq!(body["errno"], 401);

        let (_, body) = send(&app.router, get_req("/api/generation/status")).await;
        assert_eq!(body["data"]["stage"], "requiring_credential");
        assert_eq!(body["data"]["error"]["kind"], "missing_credential");
    }

    #[tokio::test]
    async fn test_full_generation_flow() {
        let app = test_app();

        let (_, body) = send(&app.router, get_req("/api/credential")).await;
        assert_eq!(body["data"]["has_credential"], false);

        let (_, body) = send(
            &app.router,
            post_json("/api/credential/set", json!({ "api_key": "test-key" })),
        )
        .await;
        assert_eq!(body["errno"], 0);

        let (_, body) = send(&app.router, get_req("/api/credential")).await;
        assert_eq!(body["data"]["has_credential"], true);

        let (_, body) = send(&app.router, post_json("/api/generation/start", start_body(true))).await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["stage"], "complete");

        let (_, body) = send(&app.router, get_req("/api/generation/status")).await;
        let artifact = &body["data"]["artifact"];
        assert_eq!(body["data"]["stage"], "complete");
        assert_eq!(body["data"]["is_active"], false);
        let audio_handle = artifact["audio_handle"].as_str().unwrap().to_string();
        let image_handle = artifact["image_handle"].as_str().unwrap().to_string();
        assert_eq!(
            artifact["audio_url"],
            format!("http://localhost:5070/api/assets/{}", audio_handle)
        );

        // 下载配图
        let response = app
            .router
            .clone()
            .oneshot(get_req(&format!("/api/assets/{}?download=true", image_handle)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            format!("attachment; filename=\"{}.png\"", image_handle)
        );

        // 只有旁白音频可以播放
        let (_, body) = send(
            &app.router,
            post_json("/api/playback/toggle", json!({ "handle": image_handle })),
        )
        .await;
        assert_eq!(body["errno"], 404);

        // 播放控制
        let toggle = json!({ "handle": audio_handle });
        let (_, body) = send(&app.router, post_json("/api/playback/toggle", toggle.clone())).await;
        assert_eq!(body["data"]["action"], "resume");
        assert_eq!(body["data"]["state"], "playing");
        let (_, body) = send(&app.router, post_json("/api/playback/ended", toggle.clone())).await;
        assert_eq!(body["data"]["state"], "paused");
        let (_, body) = send(&app.router, post_json("/api/playback/toggle", toggle)).await;
        assert_eq!(body["data"]["action"], "restart_and_resume");

        // 重置后资源被释放
        let (_, body) = send(&app.router, post_json("/api/generation/reset", json!({}))).await;
        assert_eq!(body["data"]["previous_stage"], "complete");
        assert_eq!(body["data"]["released_assets"], 2);

        let (_, body) = send(&app.router, get_req(&format!("/api/assets/{}", audio_handle))).await;
        assert_eq!(body["errno"], 404);
        let (_, body) = send(
            &app.router,
            post_json("/api/playback/toggle", json!({ "handle": audio_handle })),
        )
        .await;
        assert_eq!(body["errno"], 404);

        let (_, body) = send(&app.router, get_req("/api/generation/status")).await;
        assert_eq!(body["data"]["stage"], "idle");
    }

    #[tokio::test]
    async fn test_backend_failure_message_surfaced() {
        let app = test_app();
        send(
            &app.router,
            post_json("/api/credential/set", json!({ "api_key": "test-key" })),
        )
        .await;
        app.images.fail_with("Image quota exhausted");

        let (_, body) = send(&app.router, post_json("/api/generation/start", start_body(true))).await;
        assert_eq!(body["errno"], 503);
        assert_eq!(body["error"], "Image quota exhausted");

        let (_, body) = send(&app.router, get_req("/api/generation/status")).await;
        assert_eq!(body["data"]["stage"], "error");
        assert_eq!(body["data"]["error"]["kind"], "generation_failed");
        assert!(body["data"]["artifact"].is_null());
    }

    #[tokio::test]
    async fn test_invalid_inputs_rejected() {
        let app = test_app();

        let mut body = start_body(false);
        body["voice"] = json!("Nobody");
        let (_, resp) = send(&app.router, post_json("/api/generation/start", body)).await;
        assert_eq!(resp["errno"], 400);

        let mut body = start_body(false);
        body["rate"] = json!(4.0);
        let (_, resp) = send(&app.router, post_json("/api/generation/start", body)).await;
        assert_eq!(resp["errno"], 400);

        let (_, resp) = send(
            &app.router,
            post_json("/api/credential/set", json!({ "api_key": "  " })),
        )
        .await;
        assert_eq!(resp["errno"], 400);
    }

    #[tokio::test]
    async fn test_options_lists_voices() {
        let app = test_app();
        let (_, body) = send(&app.router, get_req("/api/generation/options")).await;
        assert_eq!(body["data"]["default_voice"], "Kore");
        assert_eq!(body["data"]["voices"].as_array().unwrap().len(), 6);
        assert_eq!(body["data"]["min_rate"], 0.5);
    }

    #[tokio::test]
    async fn test_playback_rejects_narration_of_previous_run() {
        let app = test_app();
        send(
            &app.router,
            post_json("/api/credential/set", json!({ "api_key": "test-key" })),
        )
        .await;

        let mut audio_handles = Vec::new();
        for _ in 0..2 {
            let (_, body) =
                send(&app.router, post_json("/api/generation/start", start_body(true))).await;
            assert_eq!(body["data"]["stage"], "complete");
            let (_, body) = send(&app.router, get_req("/api/generation/status")).await;
            let handle = body["data"]["artifact"]["audio_handle"].as_str().unwrap().to_string();
            audio_handles.push(handle);
        }

        // 上一次 run 的音频仍可下载，但不能再播放
        let (status, _) = send(&app.router, get_req(&format!("/api/assets/{}", audio_handles[0]))).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(
            &app.router,
            post_json("/api/playback/toggle", json!({ "handle": audio_handles[0] })),
        )
        .await;
        assert_eq!(body["errno"], 404);

        let (_, body) = send(
            &app.router,
            post_json("/api/playback/toggle", json!({ "handle": audio_handles[1] })),
        )
        .await;
        assert_eq!(body["data"]["state"], "playing");
    }

    #[tokio::test]
    async fn test_unknown_asset() {
        let app = test_app();
        let (_, body) = send(&app.router, get_req("/api/assets/nope")).await;
        assert_eq!(body["errno"], 404);

        let (_, body) = send(
            &app.router,
            post_json("/api/playback/toggle", json!({ "handle": "nope" })),
        )
        .await;
        assert_eq!(body["errno"], 404);
    }
}
