//! Playback Controller
//!
//! 两态状态机（Paused / Playing），叠加在单个音频资源句柄之上。
//! 控制器只读取句柄，不管理其生命周期；实际的播放动作由表现层执行。

use serde::{Deserialize, Serialize};

use crate::domain::generation::ResourceHandle;

/// 播放状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Paused,
    Playing,
}

/// 表现层需要对播放控件执行的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackAction {
    /// 暂停
    Pause,
    /// 从当前位置继续
    Resume,
    /// 回到开头再播放
    RestartAndResume,
}

#[derive(Debug, Clone)]
pub struct PlaybackController {
    handle: ResourceHandle,
    state: PlaybackState,
    /// 资源上次是否播放到结尾
    reached_end: bool,
}

impl PlaybackController {
    pub fn new(handle: ResourceHandle) -> Self {
        Self {
            handle,
            state: PlaybackState::Paused,
            reached_end: false,
        }
    }

    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// 切换播放状态
    pub fn toggle(&mut self) -> PlaybackAction {
        match self.state {
            PlaybackState::Playing => {
                self.state = PlaybackState::Paused;
                PlaybackAction::Pause
            }
            PlaybackState::Paused => {
                self.state = PlaybackState::Playing;
                if std::mem::take(&mut self.reached_end) {
                    PlaybackAction::RestartAndResume
                } else {
                    PlaybackAction::Resume
                }
            }
        }
    }

    /// 播放控件的 "ended" 通知：无论当前状态如何都强制暂停
    pub fn on_ended(&mut self) {
        tracing::debug!(handle = %self.handle, "Playback reached end");
        self.state = PlaybackState::Paused;
        self.reached_end = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PlaybackController {
        PlaybackController::new(ResourceHandle::new("audio-1"))
    }

    #[test]
    fn test_toggle_play_pause() {
        let mut ctl = controller();
        assert_eq!(ctl.state(), PlaybackState::Paused);

        assert_eq!(ctl.toggle(), PlaybackAction::Resume);
        assert!(ctl.is_playing());

        assert_eq!(ctl.toggle(), PlaybackAction::Pause);
        assert_eq!(ctl.state(), PlaybackState::Paused);

        // 中途暂停后从当前位置继续
        assert_eq!(ctl.toggle(), PlaybackAction::Resume);
    }

    #[test]
    fn test_ended_forces_pause_and_rewinds_on_next_play() {
        let mut ctl = controller();
        ctl.toggle();
        ctl.on_ended();
        assert_eq!(ctl.state(), PlaybackState::Paused);

        assert_eq!(ctl.toggle(), PlaybackAction::RestartAndResume);
        assert_eq!(ctl.toggle(), PlaybackAction::Pause);
        assert_eq!(ctl.toggle(), PlaybackAction::Resume);
    }

    #[test]
    fn test_ended_while_paused_stays_paused() {
        let mut ctl = controller();
        ctl.on_ended();
        assert_eq!(ctl.state(), PlaybackState::Paused);
        assert_eq!(ctl.handle().as_str(), "audio-1");
    }
}
