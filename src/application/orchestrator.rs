//! Generation Orchestrator - 生成编排
//!
//! 严格顺序执行：旁白（如需要）完成后才开始配图，任意时刻最多一个外部调用。
//! 同一时间只允许一个 run 处于进行中；状态的每次迁移都是整体替换。
//!
//! reset 可以在任意阶段调用。进行中的 run 被 reset 或被新 run 取代后，
//! 它后续的迁移都会被丢弃（`RunSuperseded`），不会覆盖新的状态。
//! 被取代的 run 的外部调用仍在进行时，新的 run 会被拒绝，直到该调用返回。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::credential_gate::CredentialGate;
use crate::application::ports::{
    ImageEnginePort, ImageRequest, NarrationEnginePort, NarrationRequest,
};
use crate::domain::generation::{
    GeneratedArtifact, GenerationError, GenerationInputs, GenerationMode, GenerationRun,
    GenerationStage, Job, RunId,
};
use crate::infrastructure::events::EventPublisher;

pub struct GenerationOrchestrator {
    state: RwLock<GenerationRun>,
    /// 是否有外部调用在进行（只在持有写锁时置位）
    call_in_flight: AtomicBool,
    credential_gate: CredentialGate,
    narration_engine: Arc<dyn NarrationEnginePort>,
    image_engine: Arc<dyn ImageEnginePort>,
    event_publisher: Arc<EventPublisher>,
}

impl GenerationOrchestrator {
    pub fn new(
        credential_gate: CredentialGate,
        narration_engine: Arc<dyn NarrationEnginePort>,
        image_engine: Arc<dyn ImageEnginePort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            state: RwLock::new(GenerationRun::Idle),
            call_in_flight: AtomicBool::new(false),
            credential_gate,
            narration_engine,
            image_engine,
            event_publisher,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 执行一次完整的 run
    pub async fn start(
        &self,
        inputs: GenerationInputs,
        mode: GenerationMode,
    ) -> Result<GeneratedArtifact, GenerationError> {
        let run_id = self.begin(inputs, mode).await?;
        self.execute(run_id).await
    }

    /// 创建 run 并进入 Validating
    ///
    /// 已有进行中的 run，或被取代的 run 的外部调用尚未返回时，返回 `RunInProgress`
    pub async fn begin(
        &self,
        inputs: GenerationInputs,
        mode: GenerationMode,
    ) -> Result<RunId, GenerationError> {
        let mut state = self.state.write().await;
        if self.call_in_flight.load(Ordering::SeqCst) {
            tracing::warn!(
                current_stage = %state.stage().as_str(),
                "Generation start rejected: previous backend call still in flight"
            );
            return Err(GenerationError::RunInProgress);
        }
        let next = match state.start(inputs, mode) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(
                    current_stage = %state.stage().as_str(),
                    "Generation start rejected: run already active"
                );
                return Err(e);
            }
        };
        let run_id = next
            .run_id()
            .ok_or_else(|| GenerationError::InvalidTransition("start produced idle run".into()))?;
        *state = next;
        drop(state);

        tracing::info!(run_id = %run_id, mode = %mode, "Generation run started");
        self.event_publisher.publish_stage_changed(
            run_id,
            GenerationStage::Validating,
            Some("Validating inputs..."),
        );
        Ok(run_id)
    }

    /// 驱动已创建的 run 直到终态
    pub async fn execute(&self, run_id: RunId) -> Result<GeneratedArtifact, GenerationError> {
        let (inputs, jobs) = {
            let state = self.state.read().await;
            match &*state {
                GenerationRun::Validating(run) if run.id() == run_id => {
                    (run.inputs().clone(), run.required_jobs())
                }
                _ => return Err(GenerationError::superseded()),
            }
        };

        // 校验和凭证检查都在任何外部调用之前完成
        if let Err(e) = inputs.validate(&jobs) {
            return self.finish_with_error(run_id, e).await;
        }
        let credential = match self.credential_gate.require_credential() {
            Ok(credential) => credential,
            Err(e) => return self.finish_with_error(run_id, e).await,
        };

        for job in jobs.ordered() {
            let call = self.begin_call(run_id, job).await?;
            let stage = GenerationStage::for_job(job);

            let result = match job {
                Job::Narration => {
                    let request = NarrationRequest {
                        text: inputs.narration_text.clone(),
                        voice: inputs.voice,
                        rate: inputs.rate,
                    };
                    self.narration_engine
                        .synthesize_narration(request, &credential)
                        .await
                }
                Job::Image => {
                    let request = ImageRequest {
                        prompt: inputs.visual_prompt.clone(),
                    };
                    self.image_engine.synthesize_image(request, &credential).await
                }
            };
            drop(call);

            match result {
                Ok(handle) => {
                    tracing::info!(run_id = %run_id, job = ?job, handle = %handle, "Job completed");
                    let recorded = handle.clone();
                    match self.advance(run_id, move |run| run.record(recorded)).await {
                        Ok(_) => {}
                        Err(GenerationError::RunSuperseded { .. }) => {
                            tracing::warn!(
                                run_id = %run_id,
                                handle = %handle,
                                "Discarding result of superseded run"
                            );
                            return Err(GenerationError::RunSuperseded {
                                orphaned: vec![handle],
                            });
                        }
                        Err(e) => return Err(e),
                    }
                }
                Err(e) => {
                    tracing::error!(run_id = %run_id, job = ?job, error = %e, "Job failed");
                    return self
                        .finish_with_error(run_id, GenerationError::failed(stage, e.to_string()))
                        .await;
                }
            }
        }

        let finished = self.advance(run_id, |run| run.complete()).await?;
        match finished {
            GenerationRun::Complete(done) => Ok(done.artifact),
            other => Err(GenerationError::InvalidTransition(format!(
                "complete produced {}",
                other.stage().as_str()
            ))),
        }
    }

    /// 重置到 Idle，返回被丢弃的 run（调用方可据此清理资源）
    pub async fn reset(&self) -> GenerationRun {
        let previous = {
            let mut state = self.state.write().await;
            std::mem::take(&mut *state)
        };
        tracing::info!(
            previous_stage = %previous.stage().as_str(),
            run_id = ?previous.run_id(),
            "Generation state reset"
        );
        self.event_publisher.publish_reset();
        previous
    }

    /// 当前状态快照
    pub async fn snapshot(&self) -> GenerationRun {
        self.state.read().await.clone()
    }

    pub async fn is_active(&self) -> bool {
        self.state.read().await.is_active()
    }

    /// run 进行中，或被取代的 run 的外部调用尚未返回
    pub async fn is_busy(&self) -> bool {
        self.is_active().await || self.call_in_flight.load(Ordering::SeqCst)
    }

    pub fn credential_gate(&self) -> &CredentialGate {
        &self.credential_gate
    }

    async fn finish_with_error<T>(
        &self,
        run_id: RunId,
        error: GenerationError,
    ) -> Result<T, GenerationError> {
        let failure = error.clone();
        self.advance(run_id, move |run| run.fail(failure)).await?;
        Err(error)
    }

    /// 对当前 run 应用一次迁移
    ///
    /// 当前状态不再属于 `run_id` 时返回 `RunSuperseded` 且不做任何修改
    async fn advance<F>(&self, run_id: RunId, transition: F) -> Result<GenerationRun, GenerationError>
    where
        F: FnOnce(GenerationRun) -> Result<GenerationRun, GenerationError>,
    {
        let mut state = self.state.write().await;
        let next = apply_transition(&mut state, run_id, transition)?;
        drop(state);

        self.publish_transition(run_id, &next);
        Ok(next)
    }

    /// 进入子任务并占用外部调用槽位
    ///
    /// 槽位在同一把写锁内置位，`begin` 不会在迁移与置位之间插入
    async fn begin_call(&self, run_id: RunId, job: Job) -> Result<InFlightCall<'_>, GenerationError> {
        let mut state = self.state.write().await;
        let next = apply_transition(&mut state, run_id, |run| run.begin_job(job))?;
        self.call_in_flight.store(true, Ordering::SeqCst);
        let call = InFlightCall {
            flag: &self.call_in_flight,
        };
        drop(state);

        self.publish_transition(run_id, &next);
        Ok(call)
    }

    fn publish_transition(&self, run_id: RunId, run: &GenerationRun) {
        tracing::debug!(run_id = %run_id, stage = %run.stage().as_str(), "Run transition");
        match run {
            GenerationRun::Complete(_) => {
                tracing::info!(run_id = %run_id, "Generation run completed");
                self.event_publisher.publish_completed(run_id);
            }
            GenerationRun::Error(failed) | GenerationRun::RequiringCredential(failed) => {
                tracing::warn!(
                    run_id = %run_id,
                    stage = %run.stage().as_str(),
                    error = %failed.error,
                    "Generation run failed"
                );
                self.event_publisher.publish_failed(
                    run_id,
                    failed.error.kind(),
                    &failed.error.user_message(),
                );
            }
            _ => {
                self.event_publisher
                    .publish_stage_changed(run_id, run.stage(), run.progress_message());
            }
        }
    }
}

fn apply_transition<F>(
    state: &mut GenerationRun,
    run_id: RunId,
    transition: F,
) -> Result<GenerationRun, GenerationError>
where
    F: FnOnce(GenerationRun) -> Result<GenerationRun, GenerationError>,
{
    if !state.is_active() || state.run_id() != Some(run_id) {
        return Err(GenerationError::superseded());
    }

    match transition(state.clone()) {
        Ok(next) => {
            *state = next.clone();
            Ok(next)
        }
        Err(e) => {
            tracing::error!(run_id = %run_id, error = %e, "Run transition rejected");
            match state.clone().fail(e.clone()) {
                Ok(failed) => *state = failed,
                Err(fail_err) => {
                    tracing::error!(
                        run_id = %run_id,
                        error = %fail_err,
                        "Could not move rejected run to error state"
                    );
                }
            }
            Err(e)
        }
    }
}

/// 外部调用槽位，离开作用域（包括 future 被丢弃）时释放
struct InFlightCall<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightCall<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::application::ports::{AssetStorePort, Credential, CredentialStorePort};
    use crate::domain::generation::{NarrationVoice, SpeakingRate};
    use crate::infrastructure::adapters::{FakeImageClient, FakeNarrationClient};
    use crate::infrastructure::memory::{InMemoryAssetStore, InMemoryCredentialStore};

    struct Fixture {
        orchestrator: Arc<GenerationOrchestrator>,
        narration: Arc<FakeNarrationClient>,
        image: Arc<FakeImageClient>,
        events: Arc<EventPublisher>,
        assets: Arc<InMemoryAssetStore>,
    }

    fn fixture(with_credential: bool) -> Fixture {
        fixture_with_latency(with_credential, Duration::ZERO)
    }

    fn fixture_with_latency(with_credential: bool, latency: Duration) -> Fixture {
        let credentials = Arc::new(InMemoryCredentialStore::new());
        if with_credential {
            credentials.set(Credential::new("test-key").unwrap()).unwrap();
        }
        let assets = Arc::new(InMemoryAssetStore::new());
        let narration = Arc::new(FakeNarrationClient::new(assets.clone()).with_latency(latency));
        let image = Arc::new(FakeImageClient::new(assets.clone()));
        let events = Arc::new(EventPublisher::new());
        let orchestrator = GenerationOrchestrator::new(
            CredentialGate::new(credentials),
            narration.clone(),
            image.clone(),
            events.clone(),
        )
        .arc();
        Fixture {
            orchestrator,
            narration,
            image,
            events,
            assets,
        }
    }

    /// 等待旁白调用真正开始
    async fn wait_for_narration_call(narration: &FakeNarrationClient, expected: usize) {
        for _ in 0..200 {
            if narration.call_count() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("narration call {} never started", expected);
    }

    fn inputs(narration: &str, prompt: &str) -> GenerationInputs {
        GenerationInputs::new(
            narration,
            prompt,
            NarrationVoice::Kore,
            SpeakingRate::default(),
        )
    }

    fn octopus() -> GenerationInputs {
        inputs("Octopuses have three hearts.", "octopus, photorealistic")
    }

    #[tokio::test]
    async fn test_both_succeed() {
        let fx = fixture(true);
        let artifact = fx
            .orchestrator
            .start(octopus(), GenerationMode::Both)
            .await
            .unwrap();

        assert!(artifact.audio.is_some());
        assert!(artifact.image.is_some());
        assert_eq!(artifact.mode, GenerationMode::Both);

        let state = fx.orchestrator.snapshot().await;
        assert_eq!(state.stage(), GenerationStage::Complete);
        assert_eq!(state.artifact(), Some(&artifact));
        assert_eq!(fx.narration.call_count(), 1);
        assert_eq!(fx.image.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_calls() {
        let fx = fixture(false);
        let result = fx.orchestrator.start(octopus(), GenerationMode::Both).await;

        assert_eq!(result.unwrap_err(), GenerationError::MissingCredential);
        let state = fx.orchestrator.snapshot().await;
        assert_eq!(state.stage(), GenerationStage::RequiringCredential);
        assert_eq!(fx.narration.call_count(), 0);
        assert_eq!(fx.image.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_narration_fails_before_any_call() {
        let fx = fixture(true);
        let result = fx
            .orchestrator
            .start(inputs("", "anything"), GenerationMode::NarrationOnly)
            .await;

        assert_eq!(result.unwrap_err(), GenerationError::EmptyNarration);
        assert_eq!(fx.orchestrator.snapshot().await.stage(), GenerationStage::Error);
        assert_eq!(fx.narration.call_count(), 0);
        assert_eq!(fx.image.call_count(), 0);
    }

    #[tokio::test]
    async fn test_validation_precedes_credential_check() {
        let fx = fixture(false);
        let result = fx
            .orchestrator
            .start(inputs("   ", ""), GenerationMode::NarrationOnly)
            .await;
        assert_eq!(result.unwrap_err(), GenerationError::EmptyNarration);
    }

    #[tokio::test]
    async fn test_narration_failure_skips_image() {
        let fx = fixture(true);
        fx.narration.fail_with("voice service unavailable");

        let result = fx.orchestrator.start(octopus(), GenerationMode::Both).await;

        match result.unwrap_err() {
            GenerationError::GenerationFailed { stage, message } => {
                assert_eq!(stage, GenerationStage::GeneratingAudio);
                assert!(message.contains("voice service unavailable"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(fx.narration.call_count(), 1);
        assert_eq!(fx.image.call_count(), 0);
    }

    #[tokio::test]
    async fn test_second_job_fails() {
        let fx = fixture(true);
        fx.image.fail_with("quota exceeded");

        let result = fx.orchestrator.start(octopus(), GenerationMode::Both).await;
        assert!(matches!(
            result,
            Err(GenerationError::GenerationFailed {
                stage: GenerationStage::GeneratingVisuals,
                ..
            })
        ));

        let state = fx.orchestrator.snapshot().await;
        assert_eq!(state.stage(), GenerationStage::Error);
        assert!(state.artifact().is_none());
        assert_eq!(state.error().unwrap().user_message(), "quota exceeded");
        // 已生成的旁白句柄保留给 UI 层清理
        assert_eq!(state.produced_handles().len(), 1);
    }

    #[tokio::test]
    async fn test_image_only_round_trip() {
        let fx = fixture(true);
        let artifact = fx
            .orchestrator
            .start(
                inputs("Echo me.", "octopus, photorealistic"),
                GenerationMode::ImageOnly,
            )
            .await
            .unwrap();

        assert_eq!(artifact.audio, None);
        assert!(artifact.image.is_some());
        assert_eq!(artifact.mode, GenerationMode::ImageOnly);
        assert_eq!(artifact.narration_text, "Echo me.");
        assert_eq!(artifact.visual_prompt, "octopus, photorealistic");
        assert_eq!(fx.narration.call_count(), 0);
    }

    #[tokio::test]
    async fn test_start_rejected_while_active() {
        let fx = fixture(true);
        let run_id = fx
            .orchestrator
            .begin(octopus(), GenerationMode::Both)
            .await
            .unwrap();
        let before = fx.orchestrator.snapshot().await;

        let rejected = fx
            .orchestrator
            .begin(inputs("other", "other"), GenerationMode::ImageOnly)
            .await;
        assert_eq!(rejected.unwrap_err(), GenerationError::RunInProgress);
        assert_eq!(fx.orchestrator.snapshot().await, before);

        // 原 run 仍可正常完成
        assert!(fx.orchestrator.execute(run_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_restart_after_terminal_state() {
        let fx = fixture(true);
        fx.orchestrator
            .start(octopus(), GenerationMode::NarrationOnly)
            .await
            .unwrap();
        assert!(fx
            .orchestrator
            .start(octopus(), GenerationMode::ImageOnly)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_reset_from_every_state() {
        // Complete
        let fx = fixture(true);
        fx.orchestrator.start(octopus(), GenerationMode::Both).await.unwrap();
        let previous = fx.orchestrator.reset().await;
        assert_eq!(previous.stage(), GenerationStage::Complete);
        assert_idle(&fx.orchestrator.snapshot().await);

        // Error
        fx.image.fail_with("boom");
        let _ = fx.orchestrator.start(octopus(), GenerationMode::Both).await;
        fx.orchestrator.reset().await;
        assert_idle(&fx.orchestrator.snapshot().await);

        // In progress
        fx.orchestrator
            .begin(octopus(), GenerationMode::Both)
            .await
            .unwrap();
        fx.orchestrator.reset().await;
        assert_idle(&fx.orchestrator.snapshot().await);
    }

    #[tokio::test]
    async fn test_reset_during_run_supersedes_it() {
        let fx = fixture(true);
        let run_id = fx
            .orchestrator
            .begin(octopus(), GenerationMode::Both)
            .await
            .unwrap();
        fx.orchestrator.reset().await;

        let result = fx.orchestrator.execute(run_id).await;
        assert_eq!(
            result.unwrap_err(),
            GenerationError::RunSuperseded { orphaned: vec![] }
        );
        assert_idle(&fx.orchestrator.snapshot().await);
        assert_eq!(fx.narration.call_count(), 0);
    }

    #[tokio::test]
    async fn test_reset_during_call_hands_back_late_handle() {
        let fx = fixture_with_latency(true, Duration::from_millis(200));
        let run_id = fx
            .orchestrator
            .begin(octopus(), GenerationMode::Both)
            .await
            .unwrap();
        let orchestrator = fx.orchestrator.clone();
        let task = tokio::spawn(async move { orchestrator.execute(run_id).await });

        wait_for_narration_call(&fx.narration, 1).await;
        assert_eq!(
            fx.orchestrator.snapshot().await.stage(),
            GenerationStage::GeneratingAudio
        );
        let previous = fx.orchestrator.reset().await;
        assert!(previous.produced_handles().is_empty());
        assert_idle(&fx.orchestrator.snapshot().await);

        let result = task.await.unwrap();
        let orphaned = match result.unwrap_err() {
            GenerationError::RunSuperseded { orphaned } => orphaned,
            other => panic!("unexpected error: {:?}", other),
        };
        assert_eq!(orphaned.len(), 1);
        assert!(fx.assets.get(&orphaned[0]).is_some());

        // 被取代的 run 不会写回状态，也不会继续配图
        assert_idle(&fx.orchestrator.snapshot().await);
        assert_eq!(fx.image.call_count(), 0);
    }

    #[tokio::test]
    async fn test_new_run_waits_for_superseded_call() {
        let fx = fixture_with_latency(true, Duration::from_millis(200));
        let run_id = fx
            .orchestrator
            .begin(octopus(), GenerationMode::NarrationOnly)
            .await
            .unwrap();
        let orchestrator = fx.orchestrator.clone();
        let task = tokio::spawn(async move { orchestrator.execute(run_id).await });

        wait_for_narration_call(&fx.narration, 1).await;
        fx.orchestrator.reset().await;
        assert!(!fx.orchestrator.is_active().await);
        assert!(fx.orchestrator.is_busy().await);

        let rejected = fx
            .orchestrator
            .begin(octopus(), GenerationMode::NarrationOnly)
            .await;
        assert_eq!(rejected.unwrap_err(), GenerationError::RunInProgress);
        assert_idle(&fx.orchestrator.snapshot().await);

        assert!(task.await.unwrap().is_err());
        assert!(!fx.orchestrator.is_busy().await);

        fx.orchestrator
            .start(octopus(), GenerationMode::NarrationOnly)
            .await
            .unwrap();
        assert_eq!(fx.narration.call_count(), 2);
        assert_eq!(fx.narration.peak_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_rejected_transition_keeps_its_error() {
        let fx = fixture(true);
        let run_id = fx
            .orchestrator
            .begin(octopus(), GenerationMode::Both)
            .await
            .unwrap();

        // 必需子任务尚未完成，complete 被拒绝
        let err = fx
            .orchestrator
            .advance(run_id, |run| run.complete())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidTransition(_)));

        let state = fx.orchestrator.snapshot().await;
        assert_eq!(state.stage(), GenerationStage::Error);
        assert_eq!(state.error(), Some(&err));
    }

    #[test]
    fn test_transition_on_foreign_run_is_superseded() {
        let mut state = GenerationRun::Idle;
        let result = apply_transition(&mut state, RunId::new(), Ok);
        assert_eq!(result.unwrap_err(), GenerationError::superseded());
        assert_eq!(state, GenerationRun::Idle);
    }

    #[tokio::test]
    async fn test_progress_events_follow_stage_order() {
        let fx = fixture(true);
        let mut rx = fx.events.subscribe();
        fx.orchestrator.start(octopus(), GenerationMode::Both).await.unwrap();

        let mut stages = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let crate::infrastructure::events::GenerationEvent::StageChanged { stage, .. } =
                event
            {
                if stages.last() != Some(&stage) {
                    stages.push(stage);
                }
            }
        }
        assert_eq!(
            stages,
            vec![
                GenerationStage::Validating,
                GenerationStage::GeneratingAudio,
                GenerationStage::GeneratingVisuals,
            ]
        );
    }

    fn assert_idle(run: &GenerationRun) {
        assert_eq!(run.stage(), GenerationStage::Idle);
        assert!(run.artifact().is_none());
        assert!(run.error().is_none());
        assert!(run.progress_message().is_none());
    }
}
