//! Credential Store Port - API 凭证存储
//!
//! 编排器只调用 `get`；`set` / `clear` 由 UI 层在两次 run 之间发起

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Credential must not be empty")]
    Empty,
}

/// API 凭证
///
/// 不变量: 去除首尾空白后非空。`Debug` 不输出明文
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Result<Self, CredentialStoreError> {
        let secret = secret.into().trim().to_string();
        if secret.is_empty() {
            return Err(CredentialStoreError::Empty);
        }
        Ok(Self(secret))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Credential Store Port
pub trait CredentialStorePort: Send + Sync {
    fn get(&self) -> Result<Option<Credential>, CredentialStoreError>;

    fn set(&self, credential: Credential) -> Result<(), CredentialStoreError>;

    fn clear(&self) -> Result<(), CredentialStoreError>;
}
