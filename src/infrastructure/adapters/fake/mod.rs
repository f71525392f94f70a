//! Fake Generation Clients - 用于测试及离线开发
//!
//! 不调用外部服务，返回固定资源；支持脚本化失败和调用计数

mod fake_image_client;
mod fake_narration_client;

pub use fake_image_client::FakeImageClient;
pub use fake_narration_client::FakeNarrationClient;
