//! Conversion logic between DTOs and domain entities.

use roundtable_shared::time::to_jst_rfc3339;

use crate::domain::{Agent, AgentType, Message, Room, RoomEvent};
use crate::infrastructure::dto::{
    http::{AgentDto, AgentTypeDto, MessageDto, RoomDetailDto, RoomSummaryDto},
    websocket::ServerEvent,
};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Agent> for AgentDto {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id.as_str().to_string(),
            agent_type: agent.agent_type.as_str().to_string(),
            name: agent.name.clone(),
            avatar: agent.avatar.clone(),
            color: agent.color.clone(),
            expertise: agent.expertise.clone(),
            status: agent.status.as_str().to_string(),
            last_active: agent.last_active.as_ref().map(to_jst_rfc3339),
        }
    }
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            agent_id: message.agent_id.as_str().to_string(),
            agent_name: message.agent_name.clone(),
            agent_type: message.agent_type.as_str().to_string(),
            timestamp: to_jst_rfc3339(&message.timestamp),
            content: message.content.clone(),
            is_new: message.is_new,
            session_id: message.session_id.as_str().to_string(),
        }
    }
}

impl From<AgentType> for AgentTypeDto {
    fn from(agent_type: AgentType) -> Self {
        let info = agent_type.info();
        Self {
            agent_type: agent_type.as_str().to_string(),
            title: info.title.to_string(),
            description: info.description.to_string(),
            icon: info.icon.to_string(),
            color: info.color.to_string(),
            expertise: info.expertise.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

impl RoomSummaryDto {
    /// `active` is scheduler state and is not part of the room entity
    pub fn from_room(room: &Room, active: bool) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            title: room.title.clone(),
            room_type: room.room_type.clone(),
            agent_count: room.agents.len(),
            message_count: room.conversation.len(),
            active,
            created: to_jst_rfc3339(&room.created),
        }
    }
}

impl RoomDetailDto {
    pub fn from_room(room: &Room, active: bool) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            title: room.title.clone(),
            room_type: room.room_type.clone(),
            agents: room.agents.iter().map(AgentDto::from).collect(),
            conversation: room.conversation.iter().map(MessageDto::from).collect(),
            active,
            created: to_jst_rfc3339(&room.created),
        }
    }
}

impl From<&RoomEvent> for ServerEvent {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::AgentStatusChanged {
                agent_id, status, ..
            } => ServerEvent::AgentStatusChanged {
                agent_id: agent_id.as_str().to_string(),
                status: status.as_str().to_string(),
            },
            RoomEvent::MessagePosted { message, .. } => ServerEvent::MessagePosted {
                message: message.into(),
            },
            RoomEvent::AgentsChanged { agents, .. } => ServerEvent::AgentsChanged {
                agents: agents.iter().map(AgentDto::from).collect(),
            },
            RoomEvent::SimulationStateChanged { active, .. } => {
                ServerEvent::SimulationStateChanged { active: *active }
            }
            RoomEvent::RoomUpdated {
                title, room_type, ..
            } => ServerEvent::RoomUpdated {
                title: title.clone(),
                room_type: room_type.clone(),
            },
            RoomEvent::RoomDeleted { .. } => ServerEvent::RoomDeleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AgentId, AgentStatus, MessageId, RoomId, SessionId};
    use roundtable_shared::time::{Clock, FixedClock};

    fn create_room() -> Room {
        // 2023-01-01 00:00:00 JST
        let created = FixedClock::new(1_672_498_800_000).now();
        let mut room = Room::new(
            RoomId::new("room-1".to_string()).unwrap(),
            "Macro".to_string(),
            "general".to_string(),
            created,
        );
        room.add_agent(AgentId::new("agent-1".to_string()).unwrap(), AgentType::Economist);
        room
    }

    #[test]
    fn test_room_detail_dto_from_room() {
        // テスト項目: Room がエージェント・作成時刻を含む詳細 DTO に変換される
        // given (前提条件):
        let room = create_room();

        // when (操作):
        let dto = RoomDetailDto::from_room(&room, true);

        // then (期待する結果):
        assert_eq!(dto.id, "room-1");
        assert!(dto.active);
        assert!(dto.created.starts_with("2023-01-01T00:00:00"));
        assert_eq!(dto.agents[0].agent_type, "ECONOMIST");
        assert_eq!(dto.agents[0].name, "Economist 1");
        assert_eq!(dto.agents[0].status, "idle");
        assert_eq!(dto.agents[0].last_active, None);
    }

    #[test]
    fn test_room_summary_counts() {
        // テスト項目: サマリー DTO にエージェント数・メッセージ数が入る
        // given (前提条件):
        let room = create_room();

        // when (操作):
        let dto = RoomSummaryDto::from_room(&room, false);

        // then (期待する結果):
        assert_eq!(dto.agent_count, 1);
        assert_eq!(dto.message_count, 0);
        assert!(!dto.active);
    }

    #[test]
    fn test_message_posted_event_to_server_event_json() {
        // テスト項目: MessagePosted イベントが type タグ付きの JSON に変換される
        // given (前提条件):
        let room = create_room();
        let message = Message::new(
            MessageId::new("msg-1".to_string()).unwrap(),
            &room.agents[0],
            "Hello".to_string(),
            room.created,
            SessionId::new("session-1".to_string()).unwrap(),
        );
        let event = RoomEvent::MessagePosted {
            room_id: room.id.clone(),
            message,
        };

        // when (操作):
        let json = serde_json::to_value(ServerEvent::from(&event)).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "message-posted");
        assert_eq!(json["message"]["agentName"], "Economist 1");
        assert_eq!(json["message"]["isNew"], true);
        assert_eq!(json["message"]["sessionId"], "session-1");
    }

    #[test]
    fn test_agent_status_event_uses_camel_case_fields() {
        // テスト項目: AgentStatusChanged のフィールド名が camelCase になる
        // given (前提条件):
        let event = RoomEvent::AgentStatusChanged {
            room_id: RoomId::generate(),
            agent_id: AgentId::new("agent-1".to_string()).unwrap(),
            status: AgentStatus::Thinking,
        };

        // when (操作):
        let json = serde_json::to_string(&ServerEvent::from(&event)).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            r#"{"type":"agent-status-changed","agentId":"agent-1","status":"thinking"}"#
        );
    }

    #[test]
    fn test_agent_type_dto_carries_catalog_metadata() {
        // テスト項目: カタログのメタデータが AgentTypeDto に反映される
        // given (前提条件):

        // when (操作):
        let dto = AgentTypeDto::from(AgentType::RiskManager);

        // then (期待する結果):
        assert_eq!(dto.agent_type, "RISK_MANAGER");
        assert_eq!(dto.title, "Risk Manager");
        assert_eq!(dto.icon, "mdi-shield-outline");
        assert_eq!(dto.expertise.len(), 3);
    }
}
