//! ドメイン層のエラー型

use thiserror::Error;

use super::AgentStatus;

/// 値オブジェクト生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("typing speed must be greater than zero")]
    ZeroTypingSpeed,

    #[error("unknown agent type '{0}'")]
    UnknownAgentType(String),
}

/// Room エンティティのルール違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("agent '{0}' not found in room")]
    AgentNotFound(String),

    #[error("agent '{agent_id}' is {actual}, expected {expected}")]
    UnexpectedAgentStatus {
        agent_id: String,
        expected: AgentStatus,
        actual: AgentStatus,
    },

    #[error("agent '{0}' is already taking a turn")]
    AnotherAgentActive(String),
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error(transparent)]
    Room(#[from] RoomError),
}

/// 永続化ストレージのエラー
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage task failed: {0}")]
    Task(String),
}
