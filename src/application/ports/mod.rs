//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod asset_store;
mod credential_store;
mod engine_error;
mod image_engine;
mod narration_engine;

pub use asset_store::{AssetStoreError, AssetStorePort, StoredAsset};
pub use credential_store::{Credential, CredentialStoreError, CredentialStorePort};
pub use engine_error::SynthesisError;
pub use image_engine::{ImageEnginePort, ImageRequest};
pub use narration_engine::{NarrationEnginePort, NarrationRequest};
