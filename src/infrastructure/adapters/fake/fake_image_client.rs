//! Fake Image Client

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::ports::{
    AssetStorePort, Credential, ImageEnginePort, ImageRequest, SynthesisError,
};
use crate::domain::generation::ResourceHandle;

/// 1x1 透明 PNG
const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Fake 配图客户端
pub struct FakeImageClient {
    asset_store: Arc<dyn AssetStorePort>,
    calls: AtomicUsize,
    failure: Mutex<Option<String>>,
    latency: Duration,
}

impl FakeImageClient {
    pub fn new(asset_store: Arc<dyn AssetStorePort>) -> Self {
        Self {
            asset_store,
            calls: AtomicUsize::new(0),
            failure: Mutex::new(None),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fail_with(&self, message: impl Into<String>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(message.into());
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageEnginePort for FakeImageClient {
    async fn synthesize_image(
        &self,
        request: ImageRequest,
        _credential: &Credential,
    ) -> Result<ResourceHandle, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            prompt_len = request.prompt.len(),
            "FakeImageClient: returning placeholder image"
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let failure = self.failure.lock().ok().and_then(|f| f.clone());
        if let Some(message) = failure {
            return Err(SynthesisError::ServiceError(message));
        }

        Ok(self.asset_store.put(PLACEHOLDER_PNG.to_vec(), "image/png")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryAssetStore;

    #[tokio::test]
    async fn test_counts_calls_and_scripts_failure() {
        let store = Arc::new(InMemoryAssetStore::new());
        let client = FakeImageClient::new(store.clone());
        let credential = Credential::new("k").unwrap();
        let request = ImageRequest {
            prompt: "p".to_string(),
        };

        let handle = client
            .synthesize_image(request.clone(), &credential)
            .await
            .unwrap();
        assert_eq!(store.get(&handle).unwrap().mime_type, "image/png");

        client.fail_with("blocked");
        let err = client.synthesize_image(request, &credential).await.unwrap_err();
        assert_eq!(err.to_string(), "blocked");
        assert_eq!(client.call_count(), 2);
    }
}
