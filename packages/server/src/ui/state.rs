//! Server state shared by all handlers.

use std::sync::Arc;

use crate::{
    domain::{RoomEventPublisher, RoomRepository},
    infrastructure::event_publisher::BroadcastRoomEventPublisher,
    scheduler::TurnScheduler,
    usecase::{
        AddAgentUseCase, CreateRoomUseCase, DeleteRoomUseCase, GetAgentTypesUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, GetSimulationStatusUseCase, PauseSimulationUseCase,
        RemoveAgentUseCase, SetTypingSpeedUseCase, StartSimulationUseCase, UpdateRoomUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// GetAgentTypesUseCase（エージェントカタログ取得）
    pub get_agent_types_usecase: GetAgentTypesUseCase,
    /// GetRoomsUseCase（Room 一覧取得）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub update_room_usecase: Arc<UpdateRoomUseCase>,
    pub delete_room_usecase: Arc<DeleteRoomUseCase>,
    pub add_agent_usecase: Arc<AddAgentUseCase>,
    pub remove_agent_usecase: Arc<RemoveAgentUseCase>,
    pub start_simulation_usecase: Arc<StartSimulationUseCase>,
    pub pause_simulation_usecase: Arc<PauseSimulationUseCase>,
    pub get_simulation_status_usecase: Arc<GetSimulationStatusUseCase>,
    pub set_typing_speed_usecase: Arc<SetTypingSpeedUseCase>,
    /// WebSocket 接続ごとの購読元
    pub events: Arc<BroadcastRoomEventPublisher>,
}

impl AppState {
    /// Wire every use case from the shared repository, scheduler and event channel.
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        scheduler: Arc<TurnScheduler>,
        events: Arc<BroadcastRoomEventPublisher>,
    ) -> Self {
        let publisher: Arc<dyn RoomEventPublisher> = events.clone();
        Self {
            get_agent_types_usecase: GetAgentTypesUseCase::new(),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(
                repository.clone(),
                scheduler.clone(),
            )),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(
                repository.clone(),
                scheduler.clone(),
            )),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(repository.clone())),
            update_room_usecase: Arc::new(UpdateRoomUseCase::new(
                repository.clone(),
                publisher.clone(),
            )),
            delete_room_usecase: Arc::new(DeleteRoomUseCase::new(
                repository.clone(),
                scheduler.clone(),
                publisher.clone(),
            )),
            add_agent_usecase: Arc::new(AddAgentUseCase::new(
                repository.clone(),
                publisher.clone(),
            )),
            remove_agent_usecase: Arc::new(RemoveAgentUseCase::new(
                repository.clone(),
                publisher,
            )),
            start_simulation_usecase: Arc::new(StartSimulationUseCase::new(scheduler.clone())),
            pause_simulation_usecase: Arc::new(PauseSimulationUseCase::new(
                repository.clone(),
                scheduler.clone(),
            )),
            get_simulation_status_usecase: Arc::new(GetSimulationStatusUseCase::new(
                repository,
                scheduler.clone(),
            )),
            set_typing_speed_usecase: Arc::new(SetTypingSpeedUseCase::new(scheduler)),
            events,
        }
    }
}
