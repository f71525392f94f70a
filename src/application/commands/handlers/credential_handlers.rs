//! Credential Command Handlers
//!
//! 凭证只允许在两次 run 之间修改

use std::sync::Arc;

use crate::application::commands::credential_commands::*;
use crate::application::error::ApplicationError;
use crate::application::orchestrator::GenerationOrchestrator;
use crate::application::ports::{Credential, CredentialStorePort};

/// SetCredential Handler
pub struct SetCredentialHandler {
    credential_store: Arc<dyn CredentialStorePort>,
    orchestrator: Arc<GenerationOrchestrator>,
}

impl SetCredentialHandler {
    pub fn new(
        credential_store: Arc<dyn CredentialStorePort>,
        orchestrator: Arc<GenerationOrchestrator>,
    ) -> Self {
        Self {
            credential_store,
            orchestrator,
        }
    }

    pub async fn handle(&self, cmd: SetCredentialCommand) -> Result<(), ApplicationError> {
        ensure_idle(&self.orchestrator).await?;
        let credential = Credential::new(cmd.api_key)?;
        self.credential_store.set(credential)?;
        tracing::info!("API credential updated");
        Ok(())
    }
}

/// ClearCredential Handler
pub struct ClearCredentialHandler {
    credential_store: Arc<dyn CredentialStorePort>,
    orchestrator: Arc<GenerationOrchestrator>,
}

impl ClearCredentialHandler {
    pub fn new(
        credential_store: Arc<dyn CredentialStorePort>,
        orchestrator: Arc<GenerationOrchestrator>,
    ) -> Self {
        Self {
            credential_store,
            orchestrator,
        }
    }

    pub async fn handle(&self, _cmd: ClearCredentialCommand) -> Result<(), ApplicationError> {
        ensure_idle(&self.orchestrator).await?;
        self.credential_store.clear()?;
        tracing::info!("API credential cleared");
        Ok(())
    }
}

async fn ensure_idle(orchestrator: &GenerationOrchestrator) -> Result<(), ApplicationError> {
    if orchestrator.is_active().await {
        return Err(ApplicationError::invalid_state(
            "Credential cannot change while a generation run is in progress",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::credential_gate::CredentialGate;
    use crate::domain::generation::{
        GenerationInputs, GenerationMode, NarrationVoice, SpeakingRate,
    };
    use crate::infrastructure::adapters::{FakeImageClient, FakeNarrationClient};
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::memory::{InMemoryAssetStore, InMemoryCredentialStore};

    fn setup() -> (Arc<InMemoryCredentialStore>, Arc<GenerationOrchestrator>) {
        let credentials = Arc::new(InMemoryCredentialStore::new());
        let assets = Arc::new(InMemoryAssetStore::new());
        let orchestrator = GenerationOrchestrator::new(
            CredentialGate::new(credentials.clone()),
            Arc::new(FakeNarrationClient::new(assets.clone())),
            Arc::new(FakeImageClient::new(assets)),
            Arc::new(EventPublisher::new()),
        )
        .arc();
        (credentials, orchestrator)
    }

    #[tokio::test]
    async fn test_set_and_clear() {
        let (store, orchestrator) = setup();
        let set = SetCredentialHandler::new(store.clone(), orchestrator.clone());
        let clear = ClearCredentialHandler::new(store.clone(), orchestrator.clone());

        set.handle(SetCredentialCommand {
            api_key: "  key-1  ".to_string(),
        })
        .await
        .unwrap();
        assert_eq!(store.get().unwrap().unwrap().expose(), "key-1");
        assert!(orchestrator.credential_gate().has_credential());

        clear.handle(ClearCredentialCommand).await.unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_key_rejected() {
        let (store, orchestrator) = setup();
        let set = SetCredentialHandler::new(store, orchestrator);
        let err = set
            .handle(SetCredentialCommand {
                api_key: "   ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_rejected_while_run_active() {
        let (store, orchestrator) = setup();
        orchestrator
            .begin(
                GenerationInputs::new("a", "b", NarrationVoice::Kore, SpeakingRate::default()),
                GenerationMode::Both,
            )
            .await
            .unwrap();

        let clear = ClearCredentialHandler::new(store, orchestrator);
        let err = clear.handle(ClearCredentialCommand).await.unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidState(_)));
    }
}
