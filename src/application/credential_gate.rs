//! Credential Gate - 生成调用前的凭证检查
//!
//! 只读取凭证存储，不包含任何网络逻辑

use std::sync::Arc;

use crate::application::ports::{Credential, CredentialStorePort};
use crate::domain::generation::GenerationError;

pub struct CredentialGate {
    store: Arc<dyn CredentialStorePort>,
}

impl CredentialGate {
    pub fn new(store: Arc<dyn CredentialStorePort>) -> Self {
        Self { store }
    }

    /// 是否存在可用凭证
    pub fn has_credential(&self) -> bool {
        self.require_credential().is_ok()
    }

    /// 获取凭证，缺失时返回 `MissingCredential`
    ///
    /// 存储读取失败同样视为缺失，由用户重新提供凭证
    pub fn require_credential(&self) -> Result<Credential, GenerationError> {
        match self.store.get() {
            Ok(Some(credential)) => Ok(credential),
            Ok(None) => Err(GenerationError::MissingCredential),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read credential store");
                Err(GenerationError::MissingCredential)
            }
        }
    }
}
