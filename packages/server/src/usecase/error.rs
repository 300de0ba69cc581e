//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{RepositoryError, RoomError, ValidationError};

/// Room の作成・更新・削除・取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomUseCaseError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Room(#[from] RoomError),
}

impl From<RepositoryError> for RoomUseCaseError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(id) => Self::RoomNotFound(id),
            RepositoryError::Room(e) => Self::Room(e),
        }
    }
}

/// エージェントの追加・削除のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentUseCaseError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("agent '{0}' not found")]
    AgentNotFound(String),

    #[error("unknown agent type '{0}'")]
    UnknownAgentType(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Room(#[from] RoomError),
}

impl From<RepositoryError> for AgentUseCaseError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(id) => Self::RoomNotFound(id),
            RepositoryError::Room(e) => Self::Room(e),
        }
    }
}

/// シミュレーション操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("room has {0} agent(s), at least 2 are required to start")]
    NotEnoughAgents(usize),

    #[error("typing speed must be greater than zero")]
    InvalidTypingSpeed,
}
