//! UseCase: Room 一覧・詳細の取得
//!
//! Room エンティティにスケジューラの実行状態（active）を添えて返します。

use std::sync::Arc;

use crate::{
    domain::{AgentType, Room, RoomId, RoomRepository},
    scheduler::TurnScheduler,
};

use super::error::RoomUseCaseError;

/// Room とその実行状態
#[derive(Debug, Clone, PartialEq)]
pub struct RoomView {
    pub room: Room,
    pub active: bool,
}

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    scheduler: Arc<TurnScheduler>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, scheduler: Arc<TurnScheduler>) -> Self {
        Self {
            repository,
            scheduler,
        }
    }

    /// 作成順の Room 一覧
    pub async fn execute(&self) -> Vec<RoomView> {
        let rooms = self.repository.get_rooms().await;
        let active_rooms = self.scheduler.active_rooms().await;
        rooms
            .into_iter()
            .map(|room| {
                let active = active_rooms.contains(&room.id);
                RoomView { room, active }
            })
            .collect()
    }
}

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
    scheduler: Arc<TurnScheduler>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, scheduler: Arc<TurnScheduler>) -> Self {
        Self {
            repository,
            scheduler,
        }
    }

    pub async fn execute(&self, room_id: &RoomId) -> Result<RoomView, RoomUseCaseError> {
        let room = self.repository.get_room_by_id(room_id).await?;
        let active = self.scheduler.is_active(room_id).await;
        Ok(RoomView { room, active })
    }
}

/// エージェントカタログ取得のユースケース
#[derive(Default)]
pub struct GetAgentTypesUseCase;

impl GetAgentTypesUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self) -> Vec<AgentType> {
        AgentType::ALL.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{AgentType, NewRoom, TemplateMessageGenerator, TypingSpeed},
        infrastructure::{
            event_publisher::BroadcastRoomEventPublisher, repository::InMemoryRoomRepository,
            storage::InMemoryStorage,
        },
        scheduler::SchedulerConfig,
    };
    use roundtable_shared::time::FixedClock;

    fn create_fixture() -> (Arc<InMemoryRoomRepository>, Arc<TurnScheduler>) {
        let clock = Arc::new(FixedClock::new(1_700_000_000_000));
        let repository = Arc::new(InMemoryRoomRepository::new(
            Arc::new(InMemoryStorage::new()),
            clock.clone(),
        ));
        let scheduler = Arc::new(TurnScheduler::new(
            repository.clone(),
            Arc::new(BroadcastRoomEventPublisher::default()),
            Arc::new(TemplateMessageGenerator),
            clock,
            SchedulerConfig::default(),
            TypingSpeed::default(),
        ));
        (repository, scheduler)
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_rooms_reports_active_flag() {
        // テスト項目: 一覧の各 Room に実行状態が反映される
        // given (前提条件):
        let (repository, scheduler) = create_fixture();
        let idle_room = repository.add_room(NewRoom::default()).await;
        let running_room = repository.add_room(NewRoom::default()).await;
        repository
            .add_agent(&running_room, AgentType::Economist)
            .await
            .unwrap();
        repository
            .add_agent(&running_room, AgentType::Trader)
            .await
            .unwrap();
        scheduler.start(&running_room).await.unwrap();
        let usecase = GetRoomsUseCase::new(repository, scheduler);

        // when (操作):
        let views = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].room.id, idle_room);
        assert!(!views[0].active);
        assert_eq!(views[1].room.id, running_room);
        assert!(views[1].active);
    }

    #[tokio::test]
    async fn test_get_room_detail_not_found() {
        // テスト項目: 存在しない Room の詳細取得は RoomNotFound になる
        // given (前提条件):
        let (repository, scheduler) = create_fixture();
        let usecase = GetRoomDetailUseCase::new(repository, scheduler);
        let missing = RoomId::generate();

        // when (操作):
        let result = usecase.execute(&missing).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RoomUseCaseError::RoomNotFound(missing.as_str().to_string()))
        );
    }

    #[test]
    fn test_get_agent_types_lists_catalog() {
        // テスト項目: カタログの 5 種類がすべて返される
        // given (前提条件):
        let usecase = GetAgentTypesUseCase::new();

        // when (操作):
        let agent_types = usecase.execute();

        // then (期待する結果):
        assert_eq!(agent_types.len(), 5);
        assert_eq!(agent_types[0], AgentType::Economist);
    }
}
