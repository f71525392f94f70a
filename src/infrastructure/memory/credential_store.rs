//! In-Memory Credential Store Implementation

use std::sync::RwLock;

use crate::application::ports::{Credential, CredentialStoreError, CredentialStorePort};

/// 内存凭证存储（测试及无持久化部署使用）
#[derive(Default)]
pub struct InMemoryCredentialStore {
    credential: RwLock<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStorePort for InMemoryCredentialStore {
    fn get(&self) -> Result<Option<Credential>, CredentialStoreError> {
        self.credential
            .read()
            .map(|c| c.clone())
            .map_err(|e| CredentialStoreError::DatabaseError(e.to_string()))
    }

    fn set(&self, credential: Credential) -> Result<(), CredentialStoreError> {
        let mut slot = self
            .credential
            .write()
            .map_err(|e| CredentialStoreError::DatabaseError(e.to_string()))?;
        *slot = Some(credential);
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        let mut slot = self
            .credential
            .write()
            .map_err(|e| CredentialStoreError::DatabaseError(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}
