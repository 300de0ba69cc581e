//! UseCase: シミュレーションの開始・停止・状態取得・タイピング速度変更

use std::sync::Arc;

use crate::{
    domain::{RoomId, RoomRepository, TypingSpeed},
    scheduler::{StartError, TurnScheduler},
};

use super::error::SimulationError;

impl From<StartError> for SimulationError {
    fn from(error: StartError) -> Self {
        match error {
            StartError::RoomNotFound(id) => Self::RoomNotFound(id),
            StartError::NotEnoughAgents { count, .. } => Self::NotEnoughAgents(count),
        }
    }
}

/// シミュレーション開始のユースケース
pub struct StartSimulationUseCase {
    scheduler: Arc<TurnScheduler>,
}

impl StartSimulationUseCase {
    pub fn new(scheduler: Arc<TurnScheduler>) -> Self {
        Self { scheduler }
    }

    /// すでに実行中の場合は何もせず `Ok(false)` を返す
    pub async fn execute(&self, room_id: &RoomId) -> Result<bool, SimulationError> {
        Ok(self.scheduler.start(room_id).await?)
    }
}

/// シミュレーション一時停止のユースケース
pub struct PauseSimulationUseCase {
    repository: Arc<dyn RoomRepository>,
    scheduler: Arc<TurnScheduler>,
}

impl PauseSimulationUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, scheduler: Arc<TurnScheduler>) -> Self {
        Self {
            repository,
            scheduler,
        }
    }

    /// 実行中だった場合は `Ok(true)`、停止済みなら `Ok(false)`
    pub async fn execute(&self, room_id: &RoomId) -> Result<bool, SimulationError> {
        ensure_room_exists(self.repository.as_ref(), room_id).await?;
        Ok(self.scheduler.pause(room_id).await)
    }
}

/// シミュレーション状態取得のユースケース
pub struct GetSimulationStatusUseCase {
    repository: Arc<dyn RoomRepository>,
    scheduler: Arc<TurnScheduler>,
}

impl GetSimulationStatusUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, scheduler: Arc<TurnScheduler>) -> Self {
        Self {
            repository,
            scheduler,
        }
    }

    pub async fn execute(&self, room_id: &RoomId) -> Result<bool, SimulationError> {
        ensure_room_exists(self.repository.as_ref(), room_id).await?;
        Ok(self.scheduler.is_active(room_id).await)
    }
}

/// タイピング速度変更のユースケース（全 Room 共通）
pub struct SetTypingSpeedUseCase {
    scheduler: Arc<TurnScheduler>,
}

impl SetTypingSpeedUseCase {
    pub fn new(scheduler: Arc<TurnScheduler>) -> Self {
        Self { scheduler }
    }

    pub fn execute(&self, chars_per_second: u32) -> Result<TypingSpeed, SimulationError> {
        let speed =
            TypingSpeed::new(chars_per_second).map_err(|_| SimulationError::InvalidTypingSpeed)?;
        self.scheduler.set_typing_speed(speed);
        Ok(speed)
    }

    pub fn current(&self) -> TypingSpeed {
        self.scheduler.typing_speed()
    }
}

async fn ensure_room_exists(
    repository: &dyn RoomRepository,
    room_id: &RoomId,
) -> Result<(), SimulationError> {
    repository
        .get_room_by_id(room_id)
        .await
        .map(|_| ())
        .map_err(|_| SimulationError::RoomNotFound(room_id.as_str().to_string()))
}
