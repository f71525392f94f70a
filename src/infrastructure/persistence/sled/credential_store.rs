//! Sled-based Credential Store Implementation

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::Db;

use crate::application::ports::{Credential, CredentialStoreError, CredentialStorePort};

const CREDENTIAL_KEY: &[u8] = b"api_key";

/// Sled 凭证存储配置
#[derive(Debug, Clone)]
pub struct SledCredentialStoreConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledCredentialStoreConfig {
    fn default() -> Self {
        Self {
            db_path: "data/credential.sled".to_string(),
        }
    }
}

/// 持久化的凭证记录
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    secret: String,
    updated_at: i64,
}

/// Sled 凭证存储
pub struct SledCredentialStore {
    db: Db,
}

impl SledCredentialStore {
    pub fn new(config: &SledCredentialStoreConfig) -> Result<Self, CredentialStoreError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| CredentialStoreError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            has_credential = db.contains_key(CREDENTIAL_KEY).unwrap_or(false),
            "SledCredentialStore initialized"
        );

        Ok(Self { db })
    }
}

impl CredentialStorePort for SledCredentialStore {
    fn get(&self) -> Result<Option<Credential>, CredentialStoreError> {
        let Some(data) = self
            .db
            .get(CREDENTIAL_KEY)
            .map_err(|e| CredentialStoreError::DatabaseError(e.to_string()))?
        else {
            return Ok(None);
        };

        let stored: StoredCredential = bincode::deserialize(&data)
            .map_err(|e| CredentialStoreError::SerializationError(e.to_string()))?;

        // 空白值视为缺失
        Ok(Credential::new(stored.secret).ok())
    }

    fn set(&self, credential: Credential) -> Result<(), CredentialStoreError> {
        let stored = StoredCredential {
            secret: credential.expose().to_string(),
            updated_at: Utc::now().timestamp(),
        };
        let bytes = bincode::serialize(&stored)
            .map_err(|e| CredentialStoreError::SerializationError(e.to_string()))?;

        self.db
            .insert(CREDENTIAL_KEY, bytes)
            .map_err(|e| CredentialStoreError::DatabaseError(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| CredentialStoreError::DatabaseError(e.to_string()))?;

        tracing::info!("Credential stored");
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        self.db
            .remove(CREDENTIAL_KEY)
            .map_err(|e| CredentialStoreError::DatabaseError(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| CredentialStoreError::DatabaseError(e.to_string()))?;

        tracing::info!("Credential cleared");
        Ok(())
    }
}
