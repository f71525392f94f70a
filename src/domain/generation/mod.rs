//! Generation Context - 生成编排限界上下文
//!
//! 职责:
//! - 生成模式与子任务集合推导
//! - 输入校验
//! - Run 状态机与生成结果

mod errors;
mod run;
mod value_objects;

pub use errors::{GenerationError, GenerationErrorKind, GENERIC_FAILURE_MESSAGE};
pub use run::{
    ActiveRun, CompletedJobs, CompletedRun, FailedRun, GeneratedArtifact, GenerationRun,
    GenerationStage,
};
pub use value_objects::{
    build_job_set, GenerationInputs, GenerationMode, Job, JobSet, NarrationVoice,
    ResourceHandle, RunId, SpeakingRate,
};
