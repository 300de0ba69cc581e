//! UseCase: Room 更新処理

use std::sync::Arc;

use crate::domain::{
    Room, RoomEvent, RoomEventPublisher, RoomId, RoomRepository, RoomTitle, RoomUpdate,
};

use super::{create_room::validate_room_type, error::RoomUseCaseError};

/// Room のタイトル・種別を更新するユースケース
pub struct UpdateRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// 変更通知の送り先
    publisher: Arc<dyn RoomEventPublisher>,
}

impl UpdateRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        publisher: Arc<dyn RoomEventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// 指定されたフィールドだけを上書きし、更新後の Room を返す
    pub async fn execute(
        &self,
        room_id: &RoomId,
        title: Option<String>,
        room_type: Option<String>,
    ) -> Result<Room, RoomUseCaseError> {
        let update = RoomUpdate {
            title: title
                .map(|title| RoomTitle::new(&title).map(RoomTitle::into_string))
                .transpose()?,
            room_type: room_type.map(validate_room_type).transpose()?,
            ..RoomUpdate::default()
        };

        let room = self.repository.update_room(room_id, update).await?;

        self.publisher.publish(RoomEvent::RoomUpdated {
            room_id: room.id.clone(),
            title: room.title.clone(),
            room_type: room.room_type.clone(),
        });

        Ok(room)
    }
}
