//! Client-side view of a watched room.
//!
//! Turns server events into what should be printed. Kept free of I/O so the
//! session only has to write the result.

use std::collections::HashSet;

use roundtable_server::infrastructure::dto::{http::AgentDto, websocket::ServerEvent};

use crate::formatter::MessageFormatter;

/// One piece of output for the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render {
    /// Printed as is
    Print(String),
    /// Header printed at once, content revealed by the typewriter
    Typed { header: String, content: String },
}

#[derive(Debug, Default)]
pub struct WatchState {
    agents: Vec<AgentDto>,
    seen_messages: HashSet<String>,
    deleted: bool,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn agents(&self) -> &[AgentDto] {
        &self.agents
    }

    pub fn apply(&mut self, event: ServerEvent) -> Vec<Render> {
        match event {
            ServerEvent::RoomSnapshot { room } => {
                self.agents = room.agents.clone();
                self.seen_messages = room.conversation.iter().map(|m| m.id.clone()).collect();
                vec![Render::Print(MessageFormatter::format_snapshot(&room))]
            }
            ServerEvent::MessagePosted { message } => {
                // 接続直後はスナップショットと同じ発言が重複して届くことがある
                if !self.seen_messages.insert(message.id.clone()) {
                    return vec![];
                }
                let header = MessageFormatter::format_message_header(&message);
                if message.is_new {
                    vec![Render::Typed {
                        header,
                        content: message.content,
                    }]
                } else {
                    vec![Render::Print(format!("{}{}\n", header, message.content))]
                }
            }
            ServerEvent::AgentStatusChanged { agent_id, status } => {
                let Some(agent) = self.agents.iter_mut().find(|a| a.id == agent_id) else {
                    return vec![];
                };
                agent.status = status.clone();
                if status == "idle" {
                    return vec![];
                }
                vec![Render::Print(MessageFormatter::format_status_change(
                    &agent.name,
                    &status,
                ))]
            }
            ServerEvent::AgentsChanged { agents } => {
                self.agents = agents;
                vec![Render::Print(format!(
                    "\n{}",
                    MessageFormatter::format_agents(&self.agents)
                ))]
            }
            ServerEvent::SimulationStateChanged { active } => {
                vec![Render::Print(MessageFormatter::format_simulation_state(
                    active,
                ))]
            }
            ServerEvent::RoomUpdated { title, room_type } => vec![Render::Print(
                MessageFormatter::format_room_updated(&title, &room_type),
            )],
            ServerEvent::RoomDeleted => {
                self.deleted = true;
                vec![Render::Print(MessageFormatter::format_room_deleted())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_server::infrastructure::dto::http::{MessageDto, RoomDetailDto};

    fn agent(id: &str, name: &str) -> AgentDto {
        AgentDto {
            id: id.to_string(),
            agent_type: "ECONOMIST".to_string(),
            name: name.to_string(),
            avatar: "mdi-finance".to_string(),
            color: "#60a5fa".to_string(),
            expertise: vec![],
            status: "idle".to_string(),
            last_active: None,
        }
    }

    fn message(id: &str, is_new: bool) -> MessageDto {
        MessageDto {
            id: id.to_string(),
            agent_id: "agent-1".to_string(),
            agent_name: "Economist 1".to_string(),
            agent_type: "ECONOMIST".to_string(),
            timestamp: "2023-01-01T09:15:30+09:00".to_string(),
            content: "Inflation is sticky.".to_string(),
            is_new,
            session_id: "session-1".to_string(),
        }
    }

    fn snapshot(conversation: Vec<MessageDto>) -> ServerEvent {
        ServerEvent::RoomSnapshot {
            room: RoomDetailDto {
                id: "room-1".to_string(),
                title: "Rates Desk".to_string(),
                room_type: "general".to_string(),
                agents: vec![agent("agent-1", "Economist 1")],
                conversation,
                active: false,
                created: "2023-01-01T09:00:00+09:00".to_string(),
            },
        }
    }

    #[test]
    fn test_new_message_is_typed() {
        // テスト項目: isNew の発言はタイプライター表示になる
        // given (前提条件):
        let mut state = WatchState::new();
        state.apply(snapshot(vec![]));

        // when (操作):
        let renders = state.apply(ServerEvent::MessagePosted {
            message: message("msg-1", true),
        });

        // then (期待する結果):
        assert_eq!(renders.len(), 1);
        assert!(matches!(
            &renders[0],
            Render::Typed { content, .. } if content == "Inflation is sticky."
        ));
    }

    #[test]
    fn test_history_message_is_printed_at_once() {
        // テスト項目: isNew でない発言は即座に全文表示される
        // given (前提条件):
        let mut state = WatchState::new();

        // when (操作):
        let renders = state.apply(ServerEvent::MessagePosted {
            message: message("msg-1", false),
        });

        // then (期待する結果):
        assert!(matches!(
            &renders[0],
            Render::Print(text) if text.contains("Inflation is sticky.")
        ));
    }

    #[test]
    fn test_message_in_snapshot_is_not_repeated() {
        // テスト項目: スナップショットに含まれる発言が再度届いても表示されない
        // given (前提条件):
        let mut state = WatchState::new();
        state.apply(snapshot(vec![message("msg-1", false)]));

        // when (操作):
        let renders = state.apply(ServerEvent::MessagePosted {
            message: message("msg-1", true),
        });

        // then (期待する結果):
        assert!(renders.is_empty());
    }

    #[test]
    fn test_status_change_tracks_agent() {
        // テスト項目: ステータス変更がエージェント名付きで表示され、idle は表示されない
        // given (前提条件):
        let mut state = WatchState::new();
        state.apply(snapshot(vec![]));

        // when (操作):
        let thinking = state.apply(ServerEvent::AgentStatusChanged {
            agent_id: "agent-1".to_string(),
            status: "thinking".to_string(),
        });
        let idle = state.apply(ServerEvent::AgentStatusChanged {
            agent_id: "agent-1".to_string(),
            status: "idle".to_string(),
        });
        let unknown = state.apply(ServerEvent::AgentStatusChanged {
            agent_id: "agent-9".to_string(),
            status: "thinking".to_string(),
        });

        // then (期待する結果):
        assert!(matches!(
            &thinking[0],
            Render::Print(text) if text.contains("Economist 1 is thinking")
        ));
        assert!(idle.is_empty());
        assert!(unknown.is_empty());
        assert_eq!(state.agents()[0].status, "idle");
    }

    #[test]
    fn test_room_deleted_marks_state() {
        // テスト項目: Room 削除イベントで削除済みになる
        // given (前提条件):
        let mut state = WatchState::new();
        state.apply(snapshot(vec![]));

        // when (操作):
        let renders = state.apply(ServerEvent::RoomDeleted);

        // then (期待する結果):
        assert!(state.is_deleted());
        assert_eq!(renders.len(), 1);
    }
}
