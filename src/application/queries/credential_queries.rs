//! Credential Queries

/// 凭证状态查询（不返回凭证内容）
#[derive(Debug, Clone, Default)]
pub struct GetCredentialStatusQuery;

#[derive(Debug, Clone)]
pub struct CredentialStatusResponse {
    pub has_credential: bool,
}
