//! UseCase: Room 作成処理

use std::sync::Arc;

use crate::domain::{NewRoom, RoomId, RoomRepository, RoomTitle, ValidationError};

use super::error::RoomUseCaseError;

/// Room 作成のユースケース
pub struct CreateRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Room 作成を実行
    ///
    /// タイトル・種別を省略した場合はデフォルト値が使われる。
    ///
    /// # Returns
    ///
    /// * `Ok(RoomId)` - 作成された Room の ID
    /// * `Err(RoomUseCaseError::Validation)` - タイトルまたは種別が不正
    pub async fn execute(
        &self,
        title: Option<String>,
        room_type: Option<String>,
    ) -> Result<RoomId, RoomUseCaseError> {
        let new_room = NewRoom {
            title: title
                .map(|title| RoomTitle::new(&title).map(RoomTitle::into_string))
                .transpose()?,
            room_type: room_type.map(validate_room_type).transpose()?,
        };
        let room_id = self.repository.add_room(new_room).await;
        tracing::info!("Room {} created", room_id);
        Ok(room_id)
    }
}

/// Room 種別は空白でない任意の文字列
pub(super) fn validate_room_type(room_type: String) -> Result<String, ValidationError> {
    let trimmed = room_type.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty("room type"));
    }
    Ok(trimmed.to_string())
}
