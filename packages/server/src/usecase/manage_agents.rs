//! UseCase: エージェントの追加・削除
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AddAgentUseCase / RemoveAgentUseCase の execute()
//! - 変更後のエージェント一覧が AgentsChanged として通知されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：カタログにある種別の追加、既存エージェントの削除
//! - 異常系：未知の種別、存在しない Room、存在しないエージェント

use std::sync::Arc;

use crate::domain::{
    Agent, AgentId, AgentType, RoomEvent, RoomEventPublisher, RoomId, RoomRepository,
    ValidationError,
};

use super::error::AgentUseCaseError;

/// エージェント追加のユースケース
pub struct AddAgentUseCase {
    repository: Arc<dyn RoomRepository>,
    publisher: Arc<dyn RoomEventPublisher>,
}

impl AddAgentUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        publisher: Arc<dyn RoomEventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// カタログの種別名（例: `"ECONOMIST"`, `"risk-manager"`）からエージェントを追加する
    pub async fn execute(
        &self,
        room_id: &RoomId,
        agent_type: &str,
    ) -> Result<Agent, AgentUseCaseError> {
        let agent_type: AgentType = agent_type.parse().map_err(|e| match e {
            ValidationError::UnknownAgentType(name) => AgentUseCaseError::UnknownAgentType(name),
            other => AgentUseCaseError::Validation(other),
        })?;

        let agent = self.repository.add_agent(room_id, agent_type).await?;
        tracing::info!("Room {}: agent '{}' joined", room_id, agent.name);

        publish_agents(self.repository.as_ref(), self.publisher.as_ref(), room_id).await;
        Ok(agent)
    }
}

/// エージェント削除のユースケース
///
/// 発言中のエージェントを削除した場合、スケジューラ側でそのターンは破棄される。
pub struct RemoveAgentUseCase {
    repository: Arc<dyn RoomRepository>,
    publisher: Arc<dyn RoomEventPublisher>,
}

impl RemoveAgentUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        publisher: Arc<dyn RoomEventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    pub async fn execute(
        &self,
        room_id: &RoomId,
        agent_id: &AgentId,
    ) -> Result<(), AgentUseCaseError> {
        let removed = self.repository.remove_agent(room_id, agent_id).await?;
        if !removed {
            return Err(AgentUseCaseError::AgentNotFound(agent_id.as_str().to_string()));
        }
        tracing::info!("Room {}: agent {} left", room_id, agent_id);

        publish_agents(self.repository.as_ref(), self.publisher.as_ref(), room_id).await;
        Ok(())
    }
}

async fn publish_agents(
    repository: &dyn RoomRepository,
    publisher: &dyn RoomEventPublisher,
    room_id: &RoomId,
) {
    // 直後に削除された場合は RoomDeleted が届くので通知しない
    if let Ok(room) = repository.get_room_by_id(room_id).await {
        publisher.publish(RoomEvent::AgentsChanged {
            room_id: room_id.clone(),
            agents: room.agents,
        });
    }
}
