//! tokio broadcast チャンネルを使った RoomEventPublisher 実装
//!
//! ## 責務
//!
//! - スケジューラ・UseCase から発行された `RoomEvent` を全購読者へ配送
//! - 購読者（WebSocket 接続）ごとの `Receiver` の払い出し
//!
//! ## 設計ノート
//!
//! どの Room のイベントを転送するかの絞り込みは購読者側（UI 層）で行います。
//! 購読者が 1 人もいない場合の送信失敗は正常系として扱います。

use tokio::sync::broadcast;

use crate::domain::{RoomEvent, RoomEventPublisher};

/// 購読者ごとにバッファできるイベント数
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// broadcast チャンネルを使った RoomEventPublisher 実装
pub struct BroadcastRoomEventPublisher {
    sender: broadcast::Sender<RoomEvent>,
}

impl BroadcastRoomEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// 以降に発行されるイベントを購読
    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.sender.subscribe()
    }

    /// 現在の購読者数
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastRoomEventPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl RoomEventPublisher for BroadcastRoomEventPublisher {
    fn publish(&self, event: RoomEvent) {
        let room_id = event.room_id().clone();
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::trace!("Published event for room {} to {} subscriber(s)", room_id, receivers)
            }
            Err(_) => tracing::trace!("No subscribers for room {}", room_id),
        }
    }
}
