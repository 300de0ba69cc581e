//! Room イベント通知の実装
//!
//! ## 概要
//!
//! このモジュールは `RoomEventPublisher` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `broadcast`: tokio の broadcast チャンネルを使った実装（WebSocket 接続ごとに購読）

pub mod broadcast;

pub use broadcast::BroadcastRoomEventPublisher;
