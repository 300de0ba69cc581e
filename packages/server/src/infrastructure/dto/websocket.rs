//! WebSocket event DTOs.
//!
//! The server pushes one JSON object per frame, tagged by `type`:
//!
//! ```json
//! {"type":"message-posted","message":{...}}
//! {"type":"agent-status-changed","agentId":"...","status":"thinking"}
//! ```

use serde::{Deserialize, Serialize};

use super::http::{AgentDto, MessageDto, RoomDetailDto};

/// Query parameters for WebSocket connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchQuery {
    pub room_id: String,
}

/// Server → client event for a single room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Sent once right after the connection is established
    RoomSnapshot { room: RoomDetailDto },
    AgentStatusChanged { agent_id: String, status: String },
    MessagePosted { message: MessageDto },
    AgentsChanged { agents: Vec<AgentDto> },
    SimulationStateChanged { active: bool },
    RoomUpdated { title: String, room_type: String },
    /// The room is gone; the server closes the connection afterwards
    RoomDeleted,
}
