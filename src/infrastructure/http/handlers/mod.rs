//! HTTP Handlers

mod asset;
mod credential;
mod generation;
mod ping;
mod playback;
mod websocket;

pub use asset::*;
pub use credential::*;
pub use generation::*;
pub use ping::*;
pub use playback::*;
pub use websocket::*;
