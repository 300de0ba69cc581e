//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! Room 一覧をメモリ上に保持し、変更のたびに一覧全体を `KeyValueStorage` へ書き出します
//! （save-on-mutation）。
//!
//! ## 永続化の方針
//!
//! - 書き込みはロックを保持したまま行うため、ストレージへの書き込み順は変更順と一致する
//! - ストレージの失敗は warn ログのみで、変更操作自体は成功させる
//! - 読み込んだ JSON が壊れている場合は空の一覧から始める（fail closed）

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use roundtable_shared::time::Clock;

use crate::domain::{
    Agent, AgentId, AgentType, DEFAULT_ROOM_TITLE, DEFAULT_ROOM_TYPE, KeyValueStorage, Message,
    NewRoom, ROOMS_STORAGE_KEY, RepositoryError, Room, RoomId, RoomRepository, RoomUpdate,
    SessionId,
};

/// 初回起動時に作成される Room のタイトル
pub const INITIAL_ROOM_TITLE: &str = "Market Analysis Room";

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// 作成順の Room 一覧
    rooms: Mutex<Vec<Room>>,
    /// 永続化先
    storage: Arc<dyn KeyValueStorage>,
    /// 作成時刻・最終発言時刻の取得元
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 空の InMemoryRoomRepository を作成（`init_rooms` で読み込む）
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(Vec::new()),
            storage,
            clock,
        }
    }

    fn build_room(&self, new_room: NewRoom) -> Room {
        Room::new(
            RoomId::generate(),
            new_room
                .title
                .unwrap_or_else(|| DEFAULT_ROOM_TITLE.to_string()),
            new_room
                .room_type
                .unwrap_or_else(|| DEFAULT_ROOM_TYPE.to_string()),
            self.clock.now(),
        )
    }

    async fn persist(&self, rooms: &[Room]) {
        let json = match serde_json::to_string(rooms) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize rooms: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set_item(ROOMS_STORAGE_KEY, json).await {
            tracing::warn!("Failed to save rooms: {}", e);
        }
    }

    /// 指定 Room を変更し、成功したら一覧全体を永続化する
    async fn mutate_room<T>(
        &self,
        room_id: &RoomId,
        f: impl FnOnce(&mut Room) -> Result<T, RepositoryError> + Send,
    ) -> Result<T, RepositoryError>
    where
        T: Send,
    {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .iter_mut()
            .find(|room| &room.id == room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;
        let value = f(room)?;
        self.persist(&rooms).await;
        Ok(value)
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn init_rooms(&self) {
        let loaded = match self.storage.get_item(ROOMS_STORAGE_KEY).await {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Room>>(&json) {
                Ok(rooms) => Some(rooms),
                Err(e) => {
                    tracing::error!("Stored rooms are corrupt, starting empty: {}", e);
                    Some(Vec::new())
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Failed to read stored rooms, starting empty: {}", e);
                Some(Vec::new())
            }
        };

        let mut rooms = self.rooms.lock().await;
        match loaded {
            Some(stored) => {
                tracing::info!("Loaded {} room(s) from storage", stored.len());
                *rooms = stored;
            }
            None => {
                let room = self.build_room(NewRoom {
                    title: Some(INITIAL_ROOM_TITLE.to_string()),
                    room_type: Some(DEFAULT_ROOM_TYPE.to_string()),
                });
                tracing::info!("No stored rooms, created default room {}", room.id);
                *rooms = vec![room];
                self.persist(&rooms).await;
            }
        }
    }

    async fn save_rooms(&self) {
        let rooms = self.rooms.lock().await;
        self.persist(&rooms).await;
    }

    async fn add_room(&self, new_room: NewRoom) -> RoomId {
        let room = self.build_room(new_room);
        let room_id = room.id.clone();

        let mut rooms = self.rooms.lock().await;
        rooms.push(room);
        self.persist(&rooms).await;

        room_id
    }

    async fn update_room(
        &self,
        room_id: &RoomId,
        update: RoomUpdate,
    ) -> Result<Room, RepositoryError> {
        self.mutate_room(room_id, move |room| {
            if let Some(title) = update.title {
                room.title = title;
            }
            if let Some(room_type) = update.room_type {
                room.room_type = room_type;
            }
            if let Some(agents) = update.agents {
                room.agents = agents;
            }
            if let Some(conversation) = update.conversation {
                room.conversation = conversation;
            }
            Ok(room.clone())
        })
        .await
    }

    async fn delete_room(&self, room_id: &RoomId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let before = rooms.len();
        rooms.retain(|room| &room.id != room_id);
        let deleted = rooms.len() != before;
        if deleted {
            self.persist(&rooms).await;
        }
        deleted
    }

    async fn get_room_by_id(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms
            .iter()
            .find(|room| &room.id == room_id)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        rooms.clone()
    }

    async fn add_agent(
        &self,
        room_id: &RoomId,
        agent_type: AgentType,
    ) -> Result<Agent, RepositoryError> {
        self.mutate_room(room_id, |room| {
            Ok(room.add_agent(AgentId::generate(), agent_type).clone())
        })
        .await
    }

    async fn remove_agent(
        &self,
        room_id: &RoomId,
        agent_id: &AgentId,
    ) -> Result<bool, RepositoryError> {
        self.mutate_room(room_id, |room| Ok(room.remove_agent(agent_id)))
            .await
    }

    async fn start_session(
        &self,
        room_id: &RoomId,
        session_id: &SessionId,
    ) -> Result<Room, RepositoryError> {
        self.mutate_room(room_id, |room| {
            room.start_session(session_id);
            Ok(room.clone())
        })
        .await
    }

    async fn begin_thinking(
        &self,
        room_id: &RoomId,
        agent_id: &AgentId,
    ) -> Result<Agent, RepositoryError> {
        let now = self.clock.now();
        self.mutate_room(room_id, |room| Ok(room.begin_thinking(agent_id, now)?.clone()))
            .await
    }

    async fn begin_speaking(
        &self,
        room_id: &RoomId,
        agent_id: &AgentId,
        message: Message,
    ) -> Result<Agent, RepositoryError> {
        let now = self.clock.now();
        self.mutate_room(room_id, move |room| {
            Ok(room.begin_speaking(agent_id, message, now)?.clone())
        })
        .await
    }

    async fn finish_speaking(
        &self,
        room_id: &RoomId,
        agent_id: &AgentId,
    ) -> Result<Agent, RepositoryError> {
        self.mutate_room(room_id, |room| Ok(room.finish_speaking(agent_id)?.clone()))
            .await
    }
}
