//! Playback Context - 旁白播放控制

mod controller;

pub use controller::{PlaybackAction, PlaybackController, PlaybackState};
