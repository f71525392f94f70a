//! Generation Query Handlers

use std::sync::Arc;

use crate::application::orchestrator::GenerationOrchestrator;
use crate::application::queries::generation_queries::*;
use crate::domain::generation::GenerationRun;

/// GetGenerationStatus Handler - 当前 run 快照
pub struct GetGenerationStatusHandler {
    orchestrator: Arc<GenerationOrchestrator>,
}

impl GetGenerationStatusHandler {
    pub fn new(orchestrator: Arc<GenerationOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn handle(&self, _query: GetGenerationStatusQuery) -> GenerationStatusResponse {
        let run = self.orchestrator.snapshot().await;
        status_of(&run)
    }
}

fn status_of(run: &GenerationRun) -> GenerationStatusResponse {
    let failure = match run {
        GenerationRun::RequiringCredential(failed) | GenerationRun::Error(failed) => {
            Some(GenerationFailureInfo {
                kind: failed.error.kind(),
                message: failed.error.user_message(),
                orphaned_assets: failed.orphaned.len(),
            })
        }
        _ => None,
    };

    let artifact = run.artifact().map(|artifact| GenerationArtifactInfo {
        audio: artifact.audio.clone(),
        image: artifact.image.clone(),
        narration_text: artifact.narration_text.clone(),
        visual_prompt: artifact.visual_prompt.clone(),
        created_at: artifact.created_at,
    });

    GenerationStatusResponse {
        stage: run.stage(),
        is_active: run.is_active(),
        run_id: run.run_id(),
        mode: run.mode(),
        progress_message: run.progress_message().map(str::to_string),
        started_at: run.started_at(),
        failure,
        artifact,
    }
}
