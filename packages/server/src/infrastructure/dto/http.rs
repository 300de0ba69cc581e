//! HTTP API request/response DTOs.
//!
//! Timestamps are rendered as JST RFC 3339 strings.

use serde::{Deserialize, Serialize};

/// Room list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub agent_count: usize,
    pub message_count: usize,
    pub active: bool,
    pub created: String,
}

/// Full room state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub agents: Vec<AgentDto>,
    pub conversation: Vec<MessageDto>,
    pub active: bool,
    pub created: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDto {
    pub id: String,
    #[serde(rename = "type")]
    pub agent_type: String,
    pub name: String,
    pub avatar: String,
    pub color: String,
    pub expertise: Vec<String>,
    pub status: String,
    pub last_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub agent_id: String,
    pub agent_name: String,
    pub agent_type: String,
    pub timestamp: String,
    pub content: String,
    pub is_new: bool,
    pub session_id: String,
}

/// Agent catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTypeDto {
    #[serde(rename = "type")]
    pub agent_type: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub expertise: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub room_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateRoomRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub room_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddAgentRequest {
    #[serde(rename = "type")]
    pub agent_type: String,
}

/// Response body of creation endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedDto {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingSpeedDto {
    pub chars_per_second: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStatusDto {
    pub room_id: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
