//! Infrastructure 層
//!
//! ドメイン層の trait（Repository, KeyValueStorage, RoomEventPublisher）の具体的な実装と、
//! 外部とのやり取りに使う DTO を提供します。

pub mod dto;
pub mod event_publisher;
pub mod repository;
pub mod storage;
