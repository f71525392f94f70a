//! Fake Narration Client

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::ports::{
    AssetStorePort, Credential, NarrationEnginePort, NarrationRequest, SynthesisError,
};
use crate::domain::generation::ResourceHandle;
use crate::infrastructure::adapters::transcoder::{silent_wav, DEFAULT_PCM_SAMPLE_RATE};

/// Fake 旁白客户端
///
/// 始终返回一段静音 WAV
pub struct FakeNarrationClient {
    asset_store: Arc<dyn AssetStorePort>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    failure: Mutex<Option<String>>,
    latency: Duration,
}

impl FakeNarrationClient {
    pub fn new(asset_store: Arc<dyn AssetStorePort>) -> Self {
        Self {
            asset_store,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            failure: Mutex::new(None),
            latency: Duration::ZERO,
        }
    }

    /// 模拟推理延迟
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// 之后的调用都以该消息失败
    pub fn fail_with(&self, message: impl Into<String>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(message.into());
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 同时进行中的调用数的峰值
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NarrationEnginePort for FakeNarrationClient {
    async fn synthesize_narration(
        &self,
        request: NarrationRequest,
        _credential: &Credential,
    ) -> Result<ResourceHandle, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        tracing::debug!(
            text_len = request.text.len(),
            voice = %request.voice,
            "FakeNarrationClient: returning silent audio"
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let failure = self.failure.lock().ok().and_then(|f| f.clone());
        if let Some(message) = failure {
            return Err(SynthesisError::ServiceError(message));
        }

        let audio = silent_wav(500, DEFAULT_PCM_SAMPLE_RATE);
        Ok(self.asset_store.put(audio, "audio/wav")?)
    }
}
