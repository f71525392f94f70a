//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod fake;
pub mod gemini;
pub mod transcoder;

pub use fake::{FakeImageClient, FakeNarrationClient};
pub use gemini::{GeminiClientConfig, GeminiImageClient, GeminiNarrationClient};
