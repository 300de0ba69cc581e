//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Agent, AgentId, AgentType, Message, RepositoryError, Room, RoomId, SessionId};

/// Room 作成時の入力
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRoom {
    /// 省略時は `DEFAULT_ROOM_TITLE`
    pub title: Option<String>,
    /// 省略時は `DEFAULT_ROOM_TYPE`
    pub room_type: Option<String>,
}

/// Room の部分更新（指定したフィールドのみ上書き、last-write-wins）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomUpdate {
    pub title: Option<String>,
    pub room_type: Option<String>,
    pub agents: Option<Vec<Agent>>,
    pub conversation: Option<Vec<Message>>,
}

/// Room Repository trait
///
/// Room の一覧を保持し、全ての変更操作のたびに一覧全体を永続化する。
/// UseCase 層とスケジューラはこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// ## 依存性の逆転（DIP）
///
/// - ドメイン層が必要とするインターフェースをドメイン層自身が定義
/// - Infrastructure 層がドメイン層のインターフェースに依存
/// - ドメイン層は Infrastructure 層に依存しない
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 永続化ストレージから Room 一覧を読み込む（何も保存されていなければデフォルト Room を作成）
    async fn init_rooms(&self);

    /// Room 一覧全体を永続化
    async fn save_rooms(&self);

    /// Room を作成し、その ID を返す
    async fn add_room(&self, new_room: NewRoom) -> RoomId;

    /// Room を部分更新し、更新後の Room を返す
    async fn update_room(&self, room_id: &RoomId, update: RoomUpdate)
    -> Result<Room, RepositoryError>;

    /// Room を削除。削除したら true（存在しなければ false）
    async fn delete_room(&self, room_id: &RoomId) -> bool;

    /// Room を取得
    async fn get_room_by_id(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// 全 Room を作成順で取得
    async fn get_rooms(&self) -> Vec<Room>;

    /// カタログからエージェントを追加
    async fn add_agent(
        &self,
        room_id: &RoomId,
        agent_type: AgentType,
    ) -> Result<Agent, RepositoryError>;

    /// エージェントを削除。削除したら true
    async fn remove_agent(
        &self,
        room_id: &RoomId,
        agent_id: &AgentId,
    ) -> Result<bool, RepositoryError>;

    /// シミュレーション開始時の一括更新（全員 idle、履歴を既読化）
    async fn start_session(
        &self,
        room_id: &RoomId,
        session_id: &SessionId,
    ) -> Result<Room, RepositoryError>;

    /// idle → thinking
    async fn begin_thinking(
        &self,
        room_id: &RoomId,
        agent_id: &AgentId,
    ) -> Result<Agent, RepositoryError>;

    /// thinking → speaking + メッセージ追加
    async fn begin_speaking(
        &self,
        room_id: &RoomId,
        agent_id: &AgentId,
        message: Message,
    ) -> Result<Agent, RepositoryError>;

    /// speaking → idle
    async fn finish_speaking(
        &self,
        room_id: &RoomId,
        agent_id: &AgentId,
    ) -> Result<Agent, RepositoryError>;
}
