//! UseCase 層
//!
//! UI 層（HTTP / WebSocket ハンドラ）から呼ばれるアプリケーションのユースケースです。
//! Repository・EventPublisher・TurnScheduler を組み合わせて 1 つの操作を実現します。

pub mod create_room;
pub mod delete_room;
pub mod error;
pub mod get_rooms;
pub mod manage_agents;
pub mod simulation;
pub mod update_room;

pub use create_room::CreateRoomUseCase;
pub use delete_room::DeleteRoomUseCase;
pub use error::{AgentUseCaseError, RoomUseCaseError, SimulationError};
pub use get_rooms::{GetAgentTypesUseCase, GetRoomDetailUseCase, GetRoomsUseCase, RoomView};
pub use manage_agents::{AddAgentUseCase, RemoveAgentUseCase};
pub use simulation::{
    GetSimulationStatusUseCase, PauseSimulationUseCase, SetTypingSpeedUseCase,
    StartSimulationUseCase,
};
pub use update_room::UpdateRoomUseCase;
