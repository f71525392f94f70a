//! Generation Command Handlers

use std::sync::Arc;

use crate::application::commands::generation_commands::*;
use crate::application::error::ApplicationError;
use crate::application::orchestrator::GenerationOrchestrator;
use crate::application::ports::AssetStorePort;
use crate::domain::generation::{
    GeneratedArtifact, GenerationError, GenerationInputs, GenerationStage, RunId, SpeakingRate,
};

/// StartGeneration Handler - 开始生成
///
/// 同步完成单飞检查并创建 run；外部调用默认在后台执行，
/// `wait` 时等待终态并把失败映射为应用层错误
pub struct StartGenerationHandler {
    orchestrator: Arc<GenerationOrchestrator>,
    asset_store: Arc<dyn AssetStorePort>,
}

impl StartGenerationHandler {
    pub fn new(
        orchestrator: Arc<GenerationOrchestrator>,
        asset_store: Arc<dyn AssetStorePort>,
    ) -> Self {
        Self {
            orchestrator,
            asset_store,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartGenerationCommand,
    ) -> Result<StartGenerationResponse, ApplicationError> {
        let rate = SpeakingRate::new(cmd.rate)?;
        let inputs = GenerationInputs::new(cmd.narration_text, cmd.visual_prompt, cmd.voice, rate);

        let run_id = self.orchestrator.begin(inputs, cmd.mode).await?;

        if cmd.wait {
            execute_run(&self.orchestrator, self.asset_store.as_ref(), run_id).await?;
            return Ok(StartGenerationResponse {
                run_id,
                stage: GenerationStage::Complete,
            });
        }

        let orchestrator = self.orchestrator.clone();
        let asset_store = self.asset_store.clone();
        tokio::spawn(async move {
            // 结果已写入 run 状态并通过事件推送，这里只记录日志
            if let Err(e) = execute_run(&orchestrator, asset_store.as_ref(), run_id).await {
                tracing::debug!(run_id = %run_id, error = %e, "Generation run ended without artifact");
            }
        });

        Ok(StartGenerationResponse {
            run_id,
            stage: GenerationStage::Validating,
        })
    }
}

/// 执行 run，并释放被取代的 run 在重置之后才产出的资源
async fn execute_run(
    orchestrator: &GenerationOrchestrator,
    asset_store: &dyn AssetStorePort,
    run_id: RunId,
) -> Result<GeneratedArtifact, GenerationError> {
    let result = orchestrator.execute(run_id).await;
    if let Err(GenerationError::RunSuperseded { orphaned }) = &result {
        if !orphaned.is_empty() {
            let released = orphaned
                .iter()
                .filter(|handle| asset_store.remove(handle))
                .count();
            tracing::info!(
                run_id = %run_id,
                released_assets = released,
                "Released assets of superseded run"
            );
        }
    }
    result
}

/// ResetGeneration Handler - 重置生成状态
///
/// 重置后释放被丢弃 run 产生的资源（包括失败 run 遗留的句柄）
pub struct ResetGenerationHandler {
    orchestrator: Arc<GenerationOrchestrator>,
    asset_store: Arc<dyn AssetStorePort>,
}

impl ResetGenerationHandler {
    pub fn new(
        orchestrator: Arc<GenerationOrchestrator>,
        asset_store: Arc<dyn AssetStorePort>,
    ) -> Self {
        Self {
            orchestrator,
            asset_store,
        }
    }

    pub async fn handle(&self, _cmd: ResetGenerationCommand) -> ResetGenerationResponse {
        let previous = self.orchestrator.reset().await;

        let released_assets = previous
            .produced_handles()
            .iter()
            .filter(|handle| self.asset_store.remove(handle))
            .count();

        tracing::debug!(
            previous_stage = %previous.stage().as_str(),
            released_assets = released_assets,
            "Generation reset handled"
        );

        ResetGenerationResponse {
            previous_stage: previous.stage(),
            released_assets,
        }
    }
}
