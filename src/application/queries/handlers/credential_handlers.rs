//! Credential Query Handlers

use std::sync::Arc;

use crate::application::orchestrator::GenerationOrchestrator;
use crate::application::queries::credential_queries::*;

/// GetCredentialStatus Handler
pub struct GetCredentialStatusHandler {
    orchestrator: Arc<GenerationOrchestrator>,
}

impl GetCredentialStatusHandler {
    pub fn new(orchestrator: Arc<GenerationOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub fn handle(&self, _query: GetCredentialStatusQuery) -> CredentialStatusResponse {
        CredentialStatusResponse {
            has_credential: self.orchestrator.credential_gate().has_credential(),
        }
    }
}
