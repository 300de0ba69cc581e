//! エンティティ: Room, Agent, Message
//!
//! 永続化 JSON の形式をそのまま表現するため、serde の camelCase で
//! シリアライズされる。Agent の状態遷移（idle → thinking → speaking → idle）は
//! Room のメソッドを経由してのみ行い、同時に 1 人しか発言中にならないことを
//! Room 自身が保証する。

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AgentId, AgentType, MessageId, RoomError, RoomId, SessionId};

/// シミュレーションを開始できる最小エージェント数
pub const MIN_AGENTS_FOR_SIMULATION: usize = 2;

/// 新規 Room のデフォルトタイトル
pub const DEFAULT_ROOM_TITLE: &str = "New Investment Room";

/// 新規 Room のデフォルト種別
pub const DEFAULT_ROOM_TYPE: &str = "general";

/// Agent の発言状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Thinking,
    Speaking,
}

impl AgentStatus {
    /// thinking / speaking のどちらかであれば true
    pub fn is_busy(self) -> bool {
        matches!(self, AgentStatus::Thinking | AgentStatus::Speaking)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Thinking => "thinking",
            AgentStatus::Speaking => "speaking",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Room に所属するエージェント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: AgentId,
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    pub name: String,
    pub avatar: String,
    pub color: String,
    pub expertise: Vec<String>,
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
}

impl Agent {
    /// カタログのメタデータから idle 状態のエージェントを作成
    ///
    /// `ordinal` は同じ種別の中での通し番号（1 始まり）で、名前の末尾に付く。
    pub fn new(id: AgentId, agent_type: AgentType, ordinal: usize) -> Self {
        let info = agent_type.info();
        Self {
            id,
            agent_type,
            name: format!("{} {}", info.title, ordinal),
            avatar: info.icon.to_string(),
            color: info.color.to_string(),
            expertise: info.expertise.iter().map(|tag| tag.to_string()).collect(),
            status: AgentStatus::Idle,
            last_active: None,
        }
    }
}

/// 会話ログの 1 メッセージ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub agent_id: AgentId,
    pub agent_name: String,
    pub agent_type: AgentType,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    /// 現在のセッションで新たに投稿されたメッセージか（再生アニメーションの抑制に使う）
    #[serde(default)]
    pub is_new: bool,
    pub session_id: SessionId,
}

impl Message {
    /// 発言者のスナップショットから新規メッセージを作成
    pub fn new(
        id: MessageId,
        speaker: &Agent,
        content: String,
        timestamp: DateTime<Utc>,
        session_id: SessionId,
    ) -> Self {
        Self {
            id,
            agent_id: speaker.id.clone(),
            agent_name: speaker.name.clone(),
            agent_type: speaker.agent_type,
            timestamp,
            content,
            is_new: true,
            session_id,
        }
    }
}

/// 会話の場となるルーム
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub title: String,
    #[serde(rename = "type")]
    pub room_type: String,
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub conversation: Vec<Message>,
    pub created: DateTime<Utc>,
}

impl Room {
    pub fn new(id: RoomId, title: String, room_type: String, created: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            room_type,
            agents: Vec::new(),
            conversation: Vec::new(),
            created,
        }
    }

    pub fn find_agent(&self, agent_id: &AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| &agent.id == agent_id)
    }

    fn find_agent_mut(&mut self, agent_id: &AgentId) -> Result<&mut Agent, RoomError> {
        self.agents
            .iter_mut()
            .find(|agent| &agent.id == agent_id)
            .ok_or_else(|| RoomError::AgentNotFound(agent_id.as_str().to_string()))
    }

    /// シミュレーションを回せるだけのエージェントがいるか
    pub fn has_enough_agents(&self) -> bool {
        self.agents.len() >= MIN_AGENTS_FOR_SIMULATION
    }

    /// thinking / speaking 中のエージェント
    pub fn busy_agent(&self) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.status.is_busy())
    }

    pub fn idle_agents(&self) -> Vec<&Agent> {
        self.agents
            .iter()
            .filter(|agent| agent.status == AgentStatus::Idle)
            .collect()
    }

    /// カタログからエージェントを追加し、追加したエージェントを返す
    pub fn add_agent(&mut self, id: AgentId, agent_type: AgentType) -> &Agent {
        let ordinal = self
            .agents
            .iter()
            .filter(|agent| agent.agent_type == agent_type)
            .count()
            + 1;
        self.agents.push(Agent::new(id, agent_type, ordinal));
        &self.agents[self.agents.len() - 1]
    }

    /// エージェントを削除する。存在しなければ false
    pub fn remove_agent(&mut self, agent_id: &AgentId) -> bool {
        let before = self.agents.len();
        self.agents.retain(|agent| &agent.id != agent_id);
        self.agents.len() != before
    }

    /// idle → thinking
    ///
    /// 他のエージェントが発言中の場合は拒否する。
    pub fn begin_thinking(
        &mut self,
        agent_id: &AgentId,
        now: DateTime<Utc>,
    ) -> Result<&Agent, RoomError> {
        if let Some(busy) = self.busy_agent()
            && &busy.id != agent_id
        {
            return Err(RoomError::AnotherAgentActive(busy.id.as_str().to_string()));
        }
        let agent = self.find_agent_mut(agent_id)?;
        expect_status(agent, AgentStatus::Idle)?;
        agent.status = AgentStatus::Thinking;
        agent.last_active = Some(now);
        Ok(&*agent)
    }

    /// thinking → speaking（同時にメッセージを会話ログへ追加）
    pub fn begin_speaking(
        &mut self,
        agent_id: &AgentId,
        message: Message,
        now: DateTime<Utc>,
    ) -> Result<&Agent, RoomError> {
        let agent = self.find_agent_mut(agent_id)?;
        expect_status(agent, AgentStatus::Thinking)?;
        agent.status = AgentStatus::Speaking;
        agent.last_active = Some(now);
        self.conversation.push(message);
        self.find_agent(agent_id)
            .ok_or_else(|| RoomError::AgentNotFound(agent_id.as_str().to_string()))
    }

    /// speaking → idle
    pub fn finish_speaking(&mut self, agent_id: &AgentId) -> Result<&Agent, RoomError> {
        let agent = self.find_agent_mut(agent_id)?;
        expect_status(agent, AgentStatus::Speaking)?;
        agent.status = AgentStatus::Idle;
        Ok(&*agent)
    }

    /// 新しいシミュレーションセッションの開始
    ///
    /// 全エージェントを idle に戻し、既存メッセージを「既読」としてセッション ID を付け替える。
    pub fn start_session(&mut self, session_id: &SessionId) {
        for agent in &mut self.agents {
            agent.status = AgentStatus::Idle;
        }
        for message in &mut self.conversation {
            message.is_new = false;
            message.session_id = session_id.clone();
        }
    }
}

fn expect_status(agent: &Agent, expected: AgentStatus) -> Result<(), RoomError> {
    if agent.status != expected {
        return Err(RoomError::UnexpectedAgentStatus {
            agent_id: agent.id.as_str().to_string(),
            expected,
            actual: agent.status,
        });
    }
    Ok(())
}
