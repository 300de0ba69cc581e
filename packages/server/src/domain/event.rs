//! Room の変更通知
//!
//! スケジューラや UseCase が Room を変更したときに発行するイベントと、
//! その通知先の抽象化（`RoomEventPublisher`）を定義します。
//! 具体的な配送方法（WebSocket へのブロードキャストなど）は Infrastructure 層が提供します。

use super::{Agent, AgentId, AgentStatus, Message, RoomId};

/// Room に起きた変更
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    AgentStatusChanged {
        room_id: RoomId,
        agent_id: AgentId,
        status: AgentStatus,
    },
    MessagePosted {
        room_id: RoomId,
        message: Message,
    },
    AgentsChanged {
        room_id: RoomId,
        agents: Vec<Agent>,
    },
    SimulationStateChanged {
        room_id: RoomId,
        active: bool,
    },
    RoomUpdated {
        room_id: RoomId,
        title: String,
        room_type: String,
    },
    RoomDeleted {
        room_id: RoomId,
    },
}

impl RoomEvent {
    pub fn room_id(&self) -> &RoomId {
        match self {
            RoomEvent::AgentStatusChanged { room_id, .. }
            | RoomEvent::MessagePosted { room_id, .. }
            | RoomEvent::AgentsChanged { room_id, .. }
            | RoomEvent::SimulationStateChanged { room_id, .. }
            | RoomEvent::RoomUpdated { room_id, .. }
            | RoomEvent::RoomDeleted { room_id } => room_id,
        }
    }
}

/// Room イベントの通知先
///
/// 購読者がいなくても失敗しない（通知は fire-and-forget）。
#[cfg_attr(test, mockall::automock)]
pub trait RoomEventPublisher: Send + Sync {
    fn publish(&self, event: RoomEvent);
}
