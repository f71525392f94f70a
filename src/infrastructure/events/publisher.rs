//! Event Publisher Implementation
//!
//! 生成进度事件推送（WebSocket 转发）。事件仅供展示，不参与任何控制流

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::domain::generation::{GenerationErrorKind, GenerationStage, RunId};

/// 生成事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum GenerationEvent {
    /// 阶段变更
    StageChanged {
        run_id: RunId,
        stage: GenerationStage,
        #[serde(skip_serializing_if = "Option::is_none")]
        progress: Option<String>,
    },
    /// Run 成功完成
    RunCompleted { run_id: RunId },
    /// Run 失败
    RunFailed {
        run_id: RunId,
        kind: GenerationErrorKind,
        message: String,
    },
    /// 状态被重置为 Idle
    RunReset,
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<GenerationEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅生成事件
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationEvent> {
        self.channel.subscribe()
    }

    /// 发布阶段变更事件
    pub fn publish_stage_changed(
        &self,
        run_id: RunId,
        stage: GenerationStage,
        progress: Option<&str>,
    ) {
        self.publish(GenerationEvent::StageChanged {
            run_id,
            stage,
            progress: progress.map(str::to_string),
        });
    }

    /// 发布完成事件
    pub fn publish_completed(&self, run_id: RunId) {
        self.publish(GenerationEvent::RunCompleted { run_id });
    }

    /// 发布失败事件
    pub fn publish_failed(&self, run_id: RunId, kind: GenerationErrorKind, message: &str) {
        self.publish(GenerationEvent::RunFailed {
            run_id,
            kind,
            message: message.to_string(),
        });
    }

    /// 发布重置事件
    pub fn publish_reset(&self) {
        self.publish(GenerationEvent::RunReset);
    }

    fn publish(&self, event: GenerationEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::debug!(error = %e, "Failed to publish event (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();
        let run_id = RunId::new();

        publisher.publish_stage_changed(run_id, GenerationStage::GeneratingAudio, Some("..."));
        publisher.publish_completed(run_id);

        match rx.recv().await.unwrap() {
            GenerationEvent::StageChanged { stage, .. } => {
                assert_eq!(stage, GenerationStage::GeneratingAudio)
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(matches!(
            rx.recv().await.unwrap(),
            GenerationEvent::RunCompleted { .. }
        ));
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let publisher = EventPublisher::new();
        publisher.publish_reset();
    }

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_value(GenerationEvent::RunReset).unwrap();
        assert_eq!(json["event"], "RunReset");
    }
}
