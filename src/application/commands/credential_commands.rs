//! Credential Commands - 凭证命令

/// 设置凭证
#[derive(Clone)]
pub struct SetCredentialCommand {
    pub api_key: String,
}

impl std::fmt::Debug for SetCredentialCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetCredentialCommand")
            .field("api_key", &"***")
            .finish()
    }
}

/// 清除凭证
#[derive(Debug, Clone, Default)]
pub struct ClearCredentialCommand;
