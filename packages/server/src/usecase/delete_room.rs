//! UseCase: Room 削除処理
//!
//! 実行中のシミュレーションを止めてから Room を削除し、購読中のクライアントへ通知します。
//! 存在しない Room の削除はエラーにしません（冪等）。

use std::sync::Arc;

use crate::{
    domain::{RoomEvent, RoomEventPublisher, RoomId, RoomRepository},
    scheduler::TurnScheduler,
};

/// Room 削除のユースケース
pub struct DeleteRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    scheduler: Arc<TurnScheduler>,
    publisher: Arc<dyn RoomEventPublisher>,
}

impl DeleteRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        scheduler: Arc<TurnScheduler>,
        publisher: Arc<dyn RoomEventPublisher>,
    ) -> Self {
        Self {
            repository,
            scheduler,
            publisher,
        }
    }

    /// Room を削除し、実際に削除したかどうかを返す
    pub async fn execute(&self, room_id: &RoomId) -> bool {
        self.scheduler.discard(room_id).await;

        let deleted = self.repository.delete_room(room_id).await;
        if deleted {
            tracing::info!("Room {} deleted", room_id);
            self.publisher.publish(RoomEvent::RoomDeleted {
                room_id: room_id.clone(),
            });
        }
        deleted
    }
}
