//! Generation Context - Run 状态机
//!
//! 每次迁移都会构造一个新的 `GenerationRun` 值整体替换旧值，
//! 不存在对某个字段的局部原地修改。
//!
//! ```text
//! Idle → Validating → (RequiringCredential) → GeneratingAudio → GeneratingVisuals → Complete
//!                 ╰──────────────── Error（任意非终态可达）
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    GenerationError, GenerationInputs, GenerationMode, Job, JobSet, ResourceHandle, RunId,
};

/// Run 阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    Idle,
    Validating,
    RequiringCredential,
    GeneratingAudio,
    GeneratingVisuals,
    Complete,
    Error,
}

impl GenerationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStage::Idle => "idle",
            GenerationStage::Validating => "validating",
            GenerationStage::RequiringCredential => "requiring_credential",
            GenerationStage::GeneratingAudio => "generating_audio",
            GenerationStage::GeneratingVisuals => "generating_visuals",
            GenerationStage::Complete => "complete",
            GenerationStage::Error => "error",
        }
    }

    /// 子任务对应的执行阶段
    pub fn for_job(job: Job) -> Self {
        match job {
            Job::Narration => GenerationStage::GeneratingAudio,
            Job::Image => GenerationStage::GeneratingVisuals,
        }
    }
}

impl std::fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            GenerationStage::GeneratingAudio => "Narration synthesis",
            GenerationStage::GeneratingVisuals => "Image synthesis",
            other => other.as_str(),
        };
        f.write_str(label)
    }
}

/// 已完成子任务的产物
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedJobs {
    pub audio: Option<ResourceHandle>,
    pub image: Option<ResourceHandle>,
}

impl CompletedJobs {
    pub fn contains(&self, job: Job) -> bool {
        match job {
            Job::Narration => self.audio.is_some(),
            Job::Image => self.image.is_some(),
        }
    }

    pub fn covers(&self, jobs: &JobSet) -> bool {
        jobs.ordered().into_iter().all(|job| self.contains(job))
    }

    pub fn handles(&self) -> Vec<ResourceHandle> {
        self.audio.iter().chain(self.image.iter()).cloned().collect()
    }
}

/// 生成结果
///
/// 不变量: 某个句柄为 `None` 只可能是因为模式未包含该子任务，
/// 失败的 run 不会产生 artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub run_id: RunId,
    pub mode: GenerationMode,
    pub audio: Option<ResourceHandle>,
    pub image: Option<ResourceHandle>,
    pub narration_text: String,
    pub visual_prompt: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedArtifact {
    pub fn handles(&self) -> Vec<ResourceHandle> {
        self.audio.iter().chain(self.image.iter()).cloned().collect()
    }
}

/// 进行中的 run
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRun {
    id: RunId,
    mode: GenerationMode,
    inputs: GenerationInputs,
    required_jobs: JobSet,
    completed: CompletedJobs,
    progress_message: String,
    started_at: DateTime<Utc>,
}

impl ActiveRun {
    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn inputs(&self) -> &GenerationInputs {
        &self.inputs
    }

    pub fn required_jobs(&self) -> JobSet {
        self.required_jobs
    }

    pub fn progress_message(&self) -> &str {
        &self.progress_message
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    fn with_progress(self, message: impl Into<String>) -> Self {
        Self {
            progress_message: message.into(),
            ..self
        }
    }
}

/// 成功结束的 run
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedRun {
    pub artifact: GeneratedArtifact,
    pub finished_at: DateTime<Utc>,
}

/// 失败结束的 run
#[derive(Debug, Clone, PartialEq)]
pub struct FailedRun {
    pub id: RunId,
    pub mode: GenerationMode,
    pub error: GenerationError,
    /// 失败前已产生的资源句柄；核心层不负责销毁
    pub orphaned: Vec<ResourceHandle>,
    pub finished_at: DateTime<Utc>,
}

/// 一次生成尝试的状态
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GenerationRun {
    #[default]
    Idle,
    Validating(ActiveRun),
    RequiringCredential(FailedRun),
    GeneratingAudio(ActiveRun),
    GeneratingVisuals(ActiveRun),
    Complete(CompletedRun),
    Error(FailedRun),
}

impl GenerationRun {
    /// 开始新的 run
    ///
    /// 只允许从 Idle 或终态开始；已有进行中的 run 时拒绝，原状态保持不变
    pub fn start(
        &self,
        inputs: GenerationInputs,
        mode: GenerationMode,
    ) -> Result<GenerationRun, GenerationError> {
        if self.is_active() {
            return Err(GenerationError::RunInProgress);
        }
        Ok(GenerationRun::Validating(ActiveRun {
            id: RunId::new(),
            mode,
            inputs,
            required_jobs: JobSet::for_mode(mode),
            completed: CompletedJobs::default(),
            progress_message: "Validating inputs...".to_string(),
            started_at: Utc::now(),
        }))
    }

    /// 进入子任务的执行阶段
    pub fn begin_job(self, job: Job) -> Result<GenerationRun, GenerationError> {
        let stage = self.stage();
        match (self, job) {
            (GenerationRun::Validating(run), Job::Narration)
                if run.required_jobs.requires(Job::Narration) =>
            {
                Ok(GenerationRun::GeneratingAudio(
                    run.with_progress("Synthesizing narration..."),
                ))
            }
            (GenerationRun::Validating(run), Job::Image)
            | (GenerationRun::GeneratingAudio(run), Job::Image)
                if run.required_jobs.requires(Job::Image)
                    && run.completed.contains(Job::Narration)
                        == run.required_jobs.requires(Job::Narration) =>
            {
                Ok(GenerationRun::GeneratingVisuals(
                    run.with_progress("Generating 16:9 visual..."),
                ))
            }
            _ => Err(invalid_transition(stage, "begin_job")),
        }
    }

    /// 记录当前子任务的产物
    pub fn record(self, handle: ResourceHandle) -> Result<GenerationRun, GenerationError> {
        match self {
            GenerationRun::GeneratingAudio(run) => {
                let completed = CompletedJobs {
                    audio: Some(handle),
                    ..run.completed.clone()
                };
                Ok(GenerationRun::GeneratingAudio(ActiveRun {
                    completed,
                    progress_message: "Narration ready".to_string(),
                    ..run
                }))
            }
            GenerationRun::GeneratingVisuals(run) => {
                let completed = CompletedJobs {
                    image: Some(handle),
                    ..run.completed.clone()
                };
                Ok(GenerationRun::GeneratingVisuals(ActiveRun {
                    completed,
                    progress_message: "Visual ready".to_string(),
                    ..run
                }))
            }
            other => Err(invalid_transition(other.stage(), "record")),
        }
    }

    /// 所有必需子任务完成后组装 artifact
    pub fn complete(self) -> Result<GenerationRun, GenerationError> {
        let stage = self.stage();
        let run = match self {
            GenerationRun::Validating(run)
            | GenerationRun::GeneratingAudio(run)
            | GenerationRun::GeneratingVisuals(run) => run,
            _ => return Err(invalid_transition(stage, "complete")),
        };
        if !run.completed.covers(&run.required_jobs) {
            return Err(invalid_transition(stage, "complete"));
        }

        let artifact = GeneratedArtifact {
            run_id: run.id,
            mode: run.mode,
            audio: run.completed.audio,
            image: run.completed.image,
            narration_text: run.inputs.narration_text,
            visual_prompt: run.inputs.visual_prompt,
            created_at: Utc::now(),
        };
        Ok(GenerationRun::Complete(CompletedRun {
            artifact,
            finished_at: Utc::now(),
        }))
    }

    /// 以错误结束 run
    ///
    /// 缺少凭证进入 RequiringCredential，其他错误进入 Error
    pub fn fail(self, error: GenerationError) -> Result<GenerationRun, GenerationError> {
        let stage = self.stage();
        let run = match self {
            GenerationRun::Validating(run)
            | GenerationRun::GeneratingAudio(run)
            | GenerationRun::GeneratingVisuals(run) => run,
            _ => return Err(invalid_transition(stage, "fail")),
        };

        let failed = FailedRun {
            id: run.id,
            mode: run.mode,
            orphaned: run.completed.handles(),
            error,
            finished_at: Utc::now(),
        };
        if failed.error == GenerationError::MissingCredential {
            Ok(GenerationRun::RequiringCredential(failed))
        } else {
            Ok(GenerationRun::Error(failed))
        }
    }

    pub fn stage(&self) -> GenerationStage {
        match self {
            GenerationRun::Idle => GenerationStage::Idle,
            GenerationRun::Validating(_) => GenerationStage::Validating,
            GenerationRun::RequiringCredential(_) => GenerationStage::RequiringCredential,
            GenerationRun::GeneratingAudio(_) => GenerationStage::GeneratingAudio,
            GenerationRun::GeneratingVisuals(_) => GenerationStage::GeneratingVisuals,
            GenerationRun::Complete(_) => GenerationStage::Complete,
            GenerationRun::Error(_) => GenerationStage::Error,
        }
    }

    pub fn run_id(&self) -> Option<RunId> {
        match self {
            GenerationRun::Idle => None,
            GenerationRun::Validating(run)
            | GenerationRun::GeneratingAudio(run)
            | GenerationRun::GeneratingVisuals(run) => Some(run.id),
            GenerationRun::Complete(done) => Some(done.artifact.run_id),
            GenerationRun::RequiringCredential(failed) | GenerationRun::Error(failed) => {
                Some(failed.id)
            }
        }
    }

    pub fn mode(&self) -> Option<GenerationMode> {
        match self {
            GenerationRun::Idle => None,
            GenerationRun::Validating(run)
            | GenerationRun::GeneratingAudio(run)
            | GenerationRun::GeneratingVisuals(run) => Some(run.mode),
            GenerationRun::Complete(done) => Some(done.artifact.mode),
            GenerationRun::RequiringCredential(failed) | GenerationRun::Error(failed) => {
                Some(failed.mode)
            }
        }
    }

    pub fn active(&self) -> Option<&ActiveRun> {
        match self {
            GenerationRun::Validating(run)
            | GenerationRun::GeneratingAudio(run)
            | GenerationRun::GeneratingVisuals(run) => Some(run),
            _ => None,
        }
    }

    /// 是否有进行中的 run
    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GenerationRun::Complete(_)
                | GenerationRun::Error(_)
                | GenerationRun::RequiringCredential(_)
        )
    }

    /// 进度文本，仅供展示
    pub fn progress_message(&self) -> Option<&str> {
        self.active().map(|run| run.progress_message())
    }

    /// 进行中的 run 的开始时间
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.active().map(ActiveRun::started_at)
    }

    pub fn error(&self) -> Option<&GenerationError> {
        match self {
            GenerationRun::RequiringCredential(failed) | GenerationRun::Error(failed) => {
                Some(&failed.error)
            }
            _ => None,
        }
    }

    pub fn artifact(&self) -> Option<&GeneratedArtifact> {
        match self {
            GenerationRun::Complete(done) => Some(&done.artifact),
            _ => None,
        }
    }

    /// 本次 run 产生的全部资源句柄（用于 UI 层清理）
    pub fn produced_handles(&self) -> Vec<ResourceHandle> {
        match self {
            GenerationRun::Idle => Vec::new(),
            GenerationRun::Validating(run)
            | GenerationRun::GeneratingAudio(run)
            | GenerationRun::GeneratingVisuals(run) => run.completed.handles(),
            GenerationRun::Complete(done) => done.artifact.handles(),
            GenerationRun::RequiringCredential(failed) | GenerationRun::Error(failed) => {
                failed.orphaned.clone()
            }
        }
    }
}

fn invalid_transition(from: GenerationStage, action: &'static str) -> GenerationError {
    GenerationError::InvalidTransition(format!("{} from {}", action, from.as_str()))
}
